//! Plain-text post export
//!
//! Single download document for one built post: title, caption, media
//! description, media instructions.

use crate::pipeline::PostDocument;

/// Render the post document in its download layout.
pub fn render_post_document(doc: &PostDocument) -> String {
    format!(
        "{}\n\nCaption:\n\n{}\n\nMedia Description:\n\n{}\n\nMedia Instructions:\n\n{}\n",
        doc.title, doc.caption, doc.media_description, doc.media_instructions,
    )
}

/// Default filename for the exported document, derived from its title.
/// Path separators and control characters become underscores; a blank or
/// sentinel title falls back to a generic name.
pub fn post_file_name(doc: &PostDocument) -> String {
    let name: String = doc
        .title
        .trim()
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    if name.is_empty() || name == crate::pipeline::ideas::NO_TITLE {
        "post.txt".to_string()
    } else {
        format!("{}.txt", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_layout() {
        let doc = PostDocument {
            title: "Wrap and Roll".into(),
            caption: "Ready, set, wrap!".into(),
            media_description: "A dynamic wrap video.".into(),
            media_instructions: "Film in natural light.".into(),
        };

        let text = render_post_document(&doc);
        assert!(text.starts_with("Wrap and Roll\n\nCaption:\n\nReady, set, wrap!"));
        assert!(text.contains("\n\nMedia Description:\n\nA dynamic wrap video."));
        assert!(text.ends_with("Media Instructions:\n\nFilm in natural light.\n"));
        assert_eq!(post_file_name(&doc), "Wrap and Roll.txt");
    }

    #[test]
    fn test_file_name_is_path_safe() {
        let doc = PostDocument {
            title: "Wrap/Roll: a b\\c".into(),
            ..Default::default()
        };
        assert_eq!(post_file_name(&doc), "Wrap_Roll: a b_c.txt");
    }

    #[test]
    fn test_untitled_post_gets_generic_file_name() {
        let untitled = PostDocument {
            title: "None".into(),
            ..Default::default()
        };
        assert_eq!(post_file_name(&untitled), "post.txt");

        let blank = PostDocument::default();
        assert_eq!(post_file_name(&blank), "post.txt");
    }
}

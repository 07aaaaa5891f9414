//! Prompt templates
//!
//! All templates addressed to the model live here, next to the builder
//! functions that fill them in. The downstream parsers depend on the exact
//! output schemas these templates dictate ("Post {n}" markers, the labeled
//! schedule blocks, the `title{n}`/`description{n}`/`datetime{n}` JSON keys),
//! so template and parser must move together.

use crate::context::BusinessContext;
use crate::inputs::UserInputs;

/// Idea generation: one call producing up to 10 "Post {n}" blocks.
pub fn build_idea_prompt(ctx: &BusinessContext, inputs: &UserInputs) -> String {
    format!(
        r#"Your Job: Generate up to 10 social media post ideas for the business described below.

Your Instructions
1. Each idea must fit the brand voice and content style.
2. Ground ideas in the business's actual products, audience, and upcoming dates.
3. Favour media the business can realistically produce.

The Output:

Your output must have the following schema for each post idea, separated by two line breaks:

Post [NUMBER]

Title: [SHORT TITLE]

Idea: [THE POST CONCEPT IN 2-3 SENTENCES]

Call-to-Action: [ONE LINE CTA]

Creative Focus: [Visual-Focused OR Concept-Focused]

Purpose: [EG. Increase Foot Traffic, Drive Engagement, Build Community]

Media: [DESCRIPTION OF THE MEDIA TO CAPTURE]

Do not use any formatting such as bold text, bullet points, or numbered lists.

The Business:

Business Name: {business_name}
Industry: {industry}
Locations: {locations}
Unique Value Proposition: {uvp}
Unique Selling Points: {usp}
Products Overview: {products_overview}
Product Details: {products_details}
Target Audience: {target_audience}
Seasonality: {seasonality}
Community Involvement: {community}
Competitive Advantage: {competitive_advantage}
Brand Values: {values}
Brand Personality: {brand_personality}
Brand Voice: {brand_voice}
Positioning: {positioning}
Content Pillars: {content_pillars}
Key Tone: {key_tone}
Caption Style: {caption_style}
Caption Examples: {caption_examples}
Key Public Dates: {key_public_dates}
Opening Hours: {opening_hours}

Brand Essence Summary: {brand_essence_summary}
Audience Summary: {audience_summary}
Content Style Summary: {content_style_summary}
Company Overview: {company_overview_summary}
Products Summary: {products_overview_summary}
Market and Audience: {market_audience_summary}
Marketing Summary: {marketing_summary}

Partnerships: {partnerships_summary}
Media Capabilities: {media}

The Operator's Goals:

Content Goals: {goals}
Key Upcoming Dates/Events: {key_dates}
"#,
        business_name = ctx.business_name,
        industry = ctx.industry,
        locations = ctx.locations,
        uvp = ctx.uvp,
        usp = ctx.usp,
        products_overview = ctx.products_overview,
        products_details = ctx.products_details,
        target_audience = ctx.target_audience,
        seasonality = ctx.seasonality,
        community = ctx.community,
        competitive_advantage = ctx.competitive_advantage,
        values = ctx.values,
        brand_personality = ctx.brand_personality,
        brand_voice = ctx.brand_voice,
        positioning = ctx.positioning,
        content_pillars = ctx.content_pillars,
        key_tone = ctx.key_tone,
        caption_style = ctx.caption_style,
        caption_examples = ctx.caption_examples,
        key_public_dates = ctx.key_public_dates,
        opening_hours = ctx.opening_hours,
        brand_essence_summary = ctx.brand_essence_summary,
        audience_summary = ctx.audience_summary,
        content_style_summary = ctx.content_style_summary,
        company_overview_summary = ctx.company_overview_summary,
        products_overview_summary = ctx.products_overview_summary,
        market_audience_summary = ctx.market_audience_summary,
        marketing_summary = ctx.marketing_summary,
        partnerships_summary = inputs.partnerships_summary,
        media = inputs.media,
        goals = inputs.goals,
        key_dates = inputs.key_dates,
    )
}

/// Calendar stage 1: order and date the staged ideas as free text.
pub fn build_schedule_prompt(slots: &[String], start_date: &str, frequency: &str) -> String {
    let mut prompt = format!(
        r#"Your Job: Provide the following list of post ideas in a calendar format to form a content calendar.

Your Instructions
1. Organise the posts into a logical order.
2. Assign logical dates and times to each post.
3. Summarise the Content Theme, Purpose, and Media info into a super concise "Description".
4. Output the content calendar in a single text output.

Consider the following when ordering and assigning dates/times:

1. The first post should be assigned the date: {start_date}.
2. All other posts should be assigned a date following the first post with a posting frequency of {frequency} posts per week.
3. The times should be in the early evening.
4. You should consider the following when generating the order:
4.1 Post Theme/Topic: Ensure varying themes/topics. Avoid posting about the same topic/theme consecutively where possible.
4.2 Media Difficulty: Ensure the first two posts have "easy to produce" media. For example, a single photo is easy to produce, whereas a short video is harder to produce.

The Output:

Your output should have the following schema for each post idea:

Post Number: [POST 1 NUMBER (EG. '1')]
Title: [POST 1 TITLE]
Description: [POST 1 DESCRIPTION]
Date: [POST 1 DATE EG. "5th December 2025"]
Time: [POST 1 TIME EG. 7pm]

You should separate each post idea with two line breaks. Do not use any formatting such as bold text, bullet points, or numbering lists.

You must include all information from the Post Ideas as below. Do not alter the Post Ideas in any way.

You should only include posts that contain data. Skip any posts that do not have any data.

Here are the post ideas.
"#,
        start_date = start_date,
        frequency = frequency,
    );

    for (i, slot) in slots.iter().enumerate() {
        prompt.push_str(&format!("\nPost {}:\n{}\n", i + 1, slot));
    }
    prompt
}

/// Calendar stage 2: restructure the schedule text to JSON.
pub fn build_structuring_prompt(schedule_text: &str) -> String {
    format!(
        r#"Format the following data in JSON format:

{schedule_text}


The data provided above is one or more post ideas. You must include all of the post ideas in the output.

You need to provide the data in valid JSON format like so:

{{
  "title1": "<title of Post 1>",
  "description1": "<description of Post 1>",
  "datetime1": "<date/time of Post 1>",

  "title2": "<title of Post 2>",
  "description2": "<description of Post 2>",
  "datetime2": "<date/time of Post 2>"
}}

Here is an example output:
{{
  "title1": "Sample Event Title",
  "description1": "Sample event description.",
  "datetime1": "2025-12-05T19:00:00+12:00"
}}

Handling Date/Time: Convert the provided date and time into an ISO 8601 format in New Zealand timezone (UTC+12:00). Use this format: "YYYY-MM-DDTHH:MM:SS+12:00". For example, "5th December 2025 at 7pm" would become "2025-12-05T19:00:00+12:00".

Handling Various Number of Posts: You will be given up to 10 post ideas. You must only include the number of posts that are provided in the JSON output.

Separating Key Value Pairs With Commas: It is imperative that you separate each key value pair with a comma.

Make sure the JSON is properly structured, including commas, and does not contain any extraneous text.
"#,
        schedule_text = schedule_text,
    )
}

/// Post builder: expand one idea into caption, media description, and media
/// instructions.
pub fn build_post_prompt(idea: &str, specific_info: &str, ctx: &BusinessContext) -> String {
    format!(
        r#"Your Job: Turn the post idea below into a complete, ready-to-publish social media post.

Your Instructions
1. Write the final caption in the brand's caption style.
2. Describe the media to produce, scene by scene where relevant.
3. Give practical capture and editing instructions an operator can follow with everyday equipment.

The Output:

Your output must use exactly these three labeled sections, separated by two line breaks:

Caption: [THE FINAL CAPTION]

Media Description: [WHAT THE MEDIA SHOWS]

Media Instructions: [HOW TO CAPTURE AND EDIT IT]

Do not use any formatting such as bold text, bullet points, or numbered lists outside the sections.

The Brand:

Business Name: {business_name}
Brand Voice: {brand_voice}
Caption Style: {caption_style}
Caption Examples: {caption_examples}
Content Style Summary: {content_style_summary}

The Post Idea:

{idea}

Specific Information For The Post:

{specific_info}
"#,
        business_name = ctx.business_name,
        brand_voice = ctx.brand_voice,
        caption_style = ctx.caption_style,
        caption_examples = ctx.caption_examples,
        content_style_summary = ctx.content_style_summary,
        idea = idea,
        specific_info = specific_info,
    )
}

/// Settings: condense the partnerships input to a single line.
pub fn build_partnerships_summary_prompt(partnerships: &str) -> String {
    format!(
        r#"Your task:
Summarize key inputs where necessary.

Your Instructions:
1) Summary of Partnerships/Collaborations: If the text is not concise, summarize the current and past partnerships or collaborations relevant to the business.

The Output:
Your output should only include the line of text. Do not include any other text preceding or following the summary.

The schema of your output should be as follows:

Partnerships/Collaborations: [Summarised partnerships and collaborations]

Below is the information to be summarised.

Partnerships/Collaborations:
{partnerships}
"#,
        partnerships = partnerships,
    )
}

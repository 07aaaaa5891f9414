//! Idea vault and calendar staging repositories
//!
//! Thin bindings between [`SlotList`] and a [`StateStore`]: every mutating
//! operation is one synchronous load → mutate → save round trip with exactly
//! one save per call. The vault holds 40 saved ideas; the staging list holds
//! the up-to-10 ideas queued for calendar assembly.

use anyhow::{bail, Result};
use tracing::info;

use crate::slots::SlotList;
use crate::store::StateStore;

pub const VAULT_CAPACITY: usize = 40;
pub const STAGING_CAPACITY: usize = 10;

pub const VAULT_KEY_PREFIX: &str = "repopostidea_";
pub const STAGING_KEY_PREFIX: &str = "calpost_";

/// The 40-slot persistent repository of saved post ideas.
pub struct Vault<S: StateStore> {
    store: S,
}

impl<S: StateStore> Vault<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<SlotList> {
        let state = self.store.load()?;
        Ok(SlotList::from_map(
            VAULT_CAPACITY,
            VAULT_KEY_PREFIX,
            &state.repo,
        ))
    }

    /// Insert an idea at the vault head. If the vault is full the oldest
    /// (bottom) entry is dropped silently.
    pub fn save_idea(&self, idea: &str) -> Result<()> {
        let mut state = self.store.load()?;
        let mut list = SlotList::from_map(VAULT_CAPACITY, VAULT_KEY_PREFIX, &state.repo);
        list.insert_at_head(idea.to_string());
        list.write_into(VAULT_KEY_PREFIX, &mut state.repo);
        self.store.save(&state)?;
        info!("Saved idea to vault ({} slots occupied)", list.occupied());
        Ok(())
    }

    /// Overwrite a vault slot in place (user edit). No compaction: edits keep
    /// their position.
    pub fn update(&self, position: usize, text: &str) -> Result<()> {
        let mut state = self.store.load()?;
        let mut list = SlotList::from_map(VAULT_CAPACITY, VAULT_KEY_PREFIX, &state.repo);
        if !list.set(position, text.to_string()) {
            bail!(
                "Vault position {} is out of range (1..={})",
                position,
                VAULT_CAPACITY
            );
        }
        list.write_into(VAULT_KEY_PREFIX, &mut state.repo);
        self.store.save(&state)
    }

    /// Clear a vault slot and left-pack the rest.
    pub fn delete(&self, position: usize) -> Result<()> {
        let mut state = self.store.load()?;
        let mut list = SlotList::from_map(VAULT_CAPACITY, VAULT_KEY_PREFIX, &state.repo);
        if !list.delete_at(position) {
            bail!(
                "Vault position {} is out of range (1..={})",
                position,
                VAULT_CAPACITY
            );
        }
        list.write_into(VAULT_KEY_PREFIX, &mut state.repo);
        self.store.save(&state)
    }

    /// Copy a vault idea into the staging list head. The vault slot itself is
    /// left untouched; removing it again is the user's call.
    pub fn promote(&self, position: usize) -> Result<()> {
        let mut state = self.store.load()?;
        let vault = SlotList::from_map(VAULT_CAPACITY, VAULT_KEY_PREFIX, &state.repo);
        let idea = match vault.get(position) {
            Some(v) if !v.trim().is_empty() => v.to_string(),
            _ => bail!("No idea in vault slot {}", position),
        };

        let mut staged = SlotList::from_map(STAGING_CAPACITY, STAGING_KEY_PREFIX, &state.cal.slots);
        staged.insert_at_head(idea);
        staged.write_into(STAGING_KEY_PREFIX, &mut state.cal.slots);
        self.store.save(&state)?;
        info!("Promoted vault slot {} to the calendar staging list", position);
        Ok(())
    }
}

/// The 10-slot calendar working set drawn from the vault.
pub struct Staging<S: StateStore> {
    store: S,
}

impl<S: StateStore> Staging<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<SlotList> {
        let state = self.store.load()?;
        Ok(SlotList::from_map(
            STAGING_CAPACITY,
            STAGING_KEY_PREFIX,
            &state.cal.slots,
        ))
    }

    /// Clear a staged slot and left-pack the rest.
    pub fn remove(&self, position: usize) -> Result<()> {
        let mut state = self.store.load()?;
        let mut list = SlotList::from_map(STAGING_CAPACITY, STAGING_KEY_PREFIX, &state.cal.slots);
        if !list.delete_at(position) {
            bail!(
                "Staging position {} is out of range (1..={})",
                position,
                STAGING_CAPACITY
            );
        }
        list.write_into(STAGING_KEY_PREFIX, &mut state.cal.slots);
        self.store.save(&state)
    }

    /// Empty every staged slot. The event id counter is untouched.
    pub fn wipe(&self) -> Result<()> {
        let mut state = self.store.load()?;
        let list = SlotList::new(STAGING_CAPACITY);
        list.write_into(STAGING_KEY_PREFIX, &mut state.cal.slots);
        self.store.save(&state)?;
        info!("Wiped all calendar staging slots");
        Ok(())
    }
}

//! Apply edited text onto a decoded payload

use super::{Entry, Uexp};
use crate::error::{Error, Result};

impl Entry {
    /// Replace the text and the text of every sub-entry named in `new`.
    ///
    /// Sub-entries are matched by id. Ids are never added or renamed.
    ///
    /// # Errors
    /// Returns [`Error::UnknownSubEntry`] if `new` names a sub-entry this
    /// entry does not have.
    pub fn update_with(&mut self, new: &Entry) -> Result<()> {
        self.text.clone_from(&new.text);
        for new_sub in &new.sub_entries {
            self.set_sub_text(&new_sub.id, &new_sub.text)?;
        }
        Ok(())
    }

    /// Replace the text of one sub-entry.
    ///
    /// # Errors
    /// Returns [`Error::UnknownSubEntry`] if there is no sub-entry `sub_id`.
    pub fn set_sub_text(&mut self, sub_id: &str, text: &str) -> Result<()> {
        if let Some(sub) = self.sub_entry_mut(sub_id) {
            sub.text = text.to_string();
            return Ok(());
        }
        Err(Error::UnknownSubEntry {
            entry: self.id.clone(),
            sub_id: sub_id.to_string(),
        })
    }
}

impl Uexp {
    /// Copy language and texts from a freshly parsed model.
    ///
    /// Every entry of `new` must already exist here. Entries are located
    /// with their own index as the hint, so models listing the same ids in
    /// the same order resolve in constant time per entry.
    ///
    /// # Errors
    /// Returns [`Error::UnknownEntry`] or [`Error::UnknownSubEntry`] for ids
    /// this payload does not have.
    pub fn update_with(&mut self, new: &Uexp) -> Result<()> {
        self.language = new.language;
        for (i, new_entry) in new.entries.iter().enumerate() {
            let index = self
                .find_entry(&new_entry.id, i)
                .ok_or_else(|| Error::UnknownEntry(new_entry.id.clone()))?;
            self.entries[index].update_with(new_entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::text::{Language, SubEntry};
    use pretty_assertions::assert_eq;

    fn with_actor(id: &str, text: &str, actor: &str) -> Entry {
        let mut entry = Entry::new(id, text);
        entry.sub_entries.push(SubEntry {
            name_id: 4,
            id: "ACTOR".to_string(),
            text: actor.to_string(),
        });
        entry
    }

    fn source() -> Uexp {
        let mut uexp = Uexp::new(Language::Us);
        uexp.entries = vec![
            with_actor("A_01", "Hello", "Cloud"),
            Entry::new("A_02", "Bye"),
            Entry::new("A_03", "Later"),
        ];
        uexp
    }

    #[test]
    fn test_update_texts() {
        let mut uexp = source();
        let mut edited = Uexp::new(Language::Fr);
        edited.entries = vec![
            with_actor("A_01", "Bonjour", "Nuage"),
            Entry::new("A_03", "A plus"),
        ];

        uexp.update_with(&edited).unwrap();

        assert_eq!(uexp.language, Language::Fr);
        assert_eq!(uexp.entries[0], {
            let mut expected = with_actor("A_01", "Bonjour", "Nuage");
            expected.sub_entries[0].name_id = 4;
            expected
        });
        assert_eq!(uexp.entries[1].text, "Bye");
        assert_eq!(uexp.entries[2].text, "A plus");
    }

    #[test]
    fn test_unknown_entry() {
        let mut uexp = source();
        let mut edited = Uexp::new(Language::Us);
        edited.entries = vec![Entry::new("A_04", "?")];
        assert!(matches!(uexp.update_with(&edited), Err(Error::UnknownEntry(id)) if id == "A_04"));
    }

    #[test]
    fn test_unknown_sub_entry() {
        let mut uexp = source();
        let mut edited = Uexp::new(Language::Us);
        let mut entry = Entry::new("A_01", "Hi");
        entry.sub_entries.push(SubEntry {
            name_id: 0,
            id: "FEMALE".to_string(),
            text: "x".to_string(),
        });
        edited.entries = vec![entry];

        assert!(matches!(
            uexp.update_with(&edited),
            Err(Error::UnknownSubEntry { sub_id, .. }) if sub_id == "FEMALE"
        ));
    }
}

/// Ordered collection of named entries, looked up by name.
///
/// Used for anything selected by a configured name at startup (credential
/// sources, providers). Registration order is preserved; `list` is sorted.
#[derive(Debug, Clone)]
pub struct NamedRegistry<T: Named> {
    entries: Vec<T>,
}

pub trait Named {
    fn name(&self) -> &str;
}

impl<T: Named + ?Sized> Named for Box<T> {
    fn name(&self) -> &str {
        self.as_ref().name()
    }
}

impl<T: Named> Default for NamedRegistry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Named> NamedRegistry<T> {
    pub fn new(entries: Vec<T>) -> Self {
        Self { entries }
    }

    /// Adds an entry, replacing any existing entry with the same name in place.
    pub fn register(&mut self, entry: T) {
        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|existing| existing.name() == entry.name())
        {
            *slot = entry;
            return;
        }
        self.entries.push(entry);
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    pub fn list(&self) -> Vec<String> {
        let mut names = self
            .entries
            .iter()
            .map(|entry| entry.name().to_string())
            .collect::<Vec<String>>();
        names.sort();
        names
    }

    pub fn entries(&self) -> &[T] {
        self.entries.as_slice()
    }
}

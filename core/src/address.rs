use std::cell::RefCell;

/// The path, query and fragment of the page location. `search` keeps its
/// leading `?` and `hash` its leading `#`; both are empty when absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Address {
    pub path: String,
    pub search: String,
    pub hash: String,
}

impl Address {
    pub fn new(path: &str, search: &str, hash: &str) -> Self {
        Self {
            path: path.to_string(),
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }

    /// Splits a same-origin href (`/path?query#fragment`).
    pub fn parse(href: &str) -> Self {
        let (rest, hash) = match href.find('#') {
            Some(idx) => (&href[..idx], &href[idx..]),
            None => (href, ""),
        };
        let (path, search) = match rest.find('?') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        let search = if search == "?" { "" } else { search };
        let hash = if hash == "#" { "" } else { hash };
        Self::new(path, search, hash)
    }

    pub fn href(&self) -> String {
        format!("{}{}{}", self.path, self.search, self.hash)
    }

    pub fn href_without_hash(&self) -> String {
        format!("{}{}", self.path, self.search)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
}

/// Access to the page location. The state-sync controller is the only writer.
pub trait AddressPort {
    fn current(&self) -> Address;
    /// Scheme of the page origin including the trailing colon, e.g. `https:`.
    fn protocol(&self) -> String;
    fn write(&self, href: &str, mode: HistoryMode);
}

/// In-memory session history. Used by headless hosts and tests.
pub struct MemoryHistory {
    protocol: String,
    entries: RefCell<Vec<Address>>,
    index: RefCell<usize>,
    writes: RefCell<Vec<(String, HistoryMode)>>,
}

impl MemoryHistory {
    pub fn new(protocol: &str, href: &str) -> Self {
        Self {
            protocol: protocol.to_string(),
            entries: RefCell::new(vec![Address::parse(href)]),
            index: RefCell::new(0),
            writes: RefCell::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn writes(&self) -> Vec<(String, HistoryMode)> {
        self.writes.borrow().clone()
    }

    /// Replaces the current entry without recording a write, as if the user
    /// had edited the fragment in the address bar.
    pub fn set_fragment(&self, hash: &str) {
        let index = *self.index.borrow();
        if let Some(entry) = self.entries.borrow_mut().get_mut(index) {
            entry.hash = hash.to_string();
        }
    }

    pub fn back(&self) -> bool {
        let mut index = self.index.borrow_mut();
        if *index == 0 {
            return false;
        }
        *index -= 1;
        true
    }

    pub fn forward(&self) -> bool {
        let mut index = self.index.borrow_mut();
        if *index + 1 >= self.entries.borrow().len() {
            return false;
        }
        *index += 1;
        true
    }
}

impl AddressPort for MemoryHistory {
    fn current(&self) -> Address {
        let index = *self.index.borrow();
        self.entries
            .borrow()
            .get(index)
            .cloned()
            .unwrap_or_default()
    }

    fn protocol(&self) -> String {
        self.protocol.clone()
    }

    fn write(&self, href: &str, mode: HistoryMode) {
        let address = Address::parse(href);
        let mut index = self.index.borrow_mut();
        let mut entries = self.entries.borrow_mut();
        match mode {
            HistoryMode::Push => {
                entries.truncate(*index + 1);
                entries.push(address);
                *index = entries.len() - 1;
            }
            HistoryMode::Replace => {
                if let Some(entry) = entries.get_mut(*index) {
                    *entry = address;
                }
            }
        }
        self.writes.borrow_mut().push((href.to_string(), mode));
    }
}

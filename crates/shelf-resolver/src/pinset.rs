//! The set of chosen versions, with an undo log for backtracking.

use std::collections::BTreeMap;

use shelf_core::constraint::Requirement;
use shelf_core::version::Version;
use shelf_util::errors::RequestTrace;

/// One requirement placed on a library, and who placed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub requirement: Requirement,
    /// Requesting libraries from the root request down to the direct requester.
    /// Empty for a root request.
    pub chain: Vec<String>,
}

impl Request {
    pub fn new(requirement: Requirement, chain: Vec<String>) -> Self {
        Self { requirement, chain }
    }

    pub fn trace(&self) -> RequestTrace {
        RequestTrace {
            constraint: self.requirement.to_string(),
            chain: self.chain.clone(),
        }
    }
}

/// A library fixed to a single version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub version: Version,
    /// Every request this version was accepted for, in arrival order.
    pub requests: Vec<Request>,
    /// Names of the libraries this version depends on.
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone)]
enum Undo {
    Inserted(String),
    Appended(String),
}

/// Position in the undo log returned by [`PinSet::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

#[derive(Debug, Clone, Default)]
pub struct PinSet {
    pins: BTreeMap<String, Pin>,
    log: Vec<Undo>,
}

impl PinSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Pin> {
        self.pins.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pins.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Pins in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pin)> {
        self.pins.iter().map(|(name, pin)| (name.as_str(), pin))
    }

    /// Pin `name`. Returns `false` without changes if it is already pinned.
    pub fn insert(&mut self, name: &str, pin: Pin) -> bool {
        if self.pins.contains_key(name) {
            return false;
        }
        self.pins.insert(name.to_string(), pin);
        self.log.push(Undo::Inserted(name.to_string()));
        true
    }

    /// Record another request satisfied by the existing pin of `name`.
    pub fn append_request(&mut self, name: &str, request: Request) -> bool {
        let Some(pin) = self.pins.get_mut(name) else {
            return false;
        };
        pin.requests.push(request);
        self.log.push(Undo::Appended(name.to_string()));
        true
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.log.len())
    }

    /// Undo every insertion and appended request made since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        while self.log.len() > checkpoint.0 {
            match self.log.pop() {
                Some(Undo::Inserted(name)) => {
                    self.pins.remove(&name);
                }
                Some(Undo::Appended(name)) => {
                    if let Some(pin) = self.pins.get_mut(&name) {
                        pin.requests.pop();
                    }
                }
                None => break,
            }
        }
    }

    /// Forget the undo history, keeping the current pins.
    pub fn commit(&mut self) {
        self.log.clear();
    }

    pub fn into_pins(self) -> BTreeMap<String, Pin> {
        self.pins
    }
}

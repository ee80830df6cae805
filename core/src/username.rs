use rand::Rng;

use crate::ports::KeyValueStore;

pub const USERNAME_KEY: &str = "tw:username";

const USERNAME_DIGITS: usize = 4;

/// `player` followed by four random digits.
pub fn random_username<R: Rng + ?Sized>(rng: &mut R) -> String {
    let number = rng.gen_range(0..10u32.pow(USERNAME_DIGITS as u32));
    format!("player{number:0width$}", width = USERNAME_DIGITS)
}

pub fn stored_username(storage: &dyn KeyValueStore) -> Option<String> {
    storage.get(USERNAME_KEY)
}

pub fn store_username(storage: &dyn KeyValueStore, username: &str) {
    storage.set(USERNAME_KEY, username);
}

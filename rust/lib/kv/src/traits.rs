use crate::error::KVError;

/// Byte encoding of `true` for [`KVStore::set_bool`].
const TRUE_BYTE: u8 = 1;
/// Byte encoding of `false` for [`KVStore::set_bool`].
const FALSE_BYTE: u8 = 0;

/// KVStore is a flat key-value storage interface for small client-side
/// records (login session, preferences).
///
/// Keys are plain snake_case names such as `user_email` or `is_logged_in`.
/// Values are raw bytes; the typed accessors below fix the encoding for
/// strings (UTF-8) and booleans (one byte, `1`/`0`).
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Set several keys in one write. Implementations backed by a
    /// transactional store commit all entries or none.
    fn batch_set(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Delete several keys in one write.
    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError> {
        for key in keys {
            self.delete(key)?;
        }
        Ok(())
    }

    /// Set some keys and delete others in one write. Transactional
    /// implementations commit both halves together.
    fn batch_write(&self, sets: &[(&str, &[u8])], deletes: &[&str]) -> Result<(), KVError> {
        self.batch_set(sets)?;
        self.batch_delete(deletes)
    }

    /// Read a UTF-8 string value.
    fn get_string(&self, key: &str) -> Result<Option<String>, KVError> {
        match self.get(key)? {
            Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| KVError::Decode {
                key: key.to_string(),
                expected: "a UTF-8 string",
            }),
            None => Ok(None),
        }
    }

    /// Store a UTF-8 string value.
    fn set_string(&self, key: &str, value: &str) -> Result<(), KVError> {
        self.set(key, value.as_bytes())
    }

    /// Read a boolean value stored by [`KVStore::set_bool`].
    fn get_bool(&self, key: &str) -> Result<Option<bool>, KVError> {
        match self.get(key)?.as_deref() {
            Some([TRUE_BYTE]) => Ok(Some(true)),
            Some([FALSE_BYTE]) => Ok(Some(false)),
            Some(_) => Err(KVError::Decode {
                key: key.to_string(),
                expected: "a boolean",
            }),
            None => Ok(None),
        }
    }

    /// Store a boolean value as a single byte.
    fn set_bool(&self, key: &str, value: bool) -> Result<(), KVError> {
        self.set(key, &[encode_bool(value)])
    }
}

/// Encode a boolean the way [`KVStore::set_bool`] does, for batch writes.
pub fn encode_bool(value: bool) -> u8 {
    if value { TRUE_BYTE } else { FALSE_BYTE }
}

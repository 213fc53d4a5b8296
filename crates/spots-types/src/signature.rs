use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::item::Item;

macro_rules! digest_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name([u8; 32]);

        impl $name {
            /// Create from a pre-computed hash.
            pub fn from_hash(hash: [u8; 32]) -> Self {
                Self(hash)
            }

            /// The raw 32-byte hash.
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Hex-encoded string representation.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Short hex representation (first 8 characters).
            pub fn short_hex(&self) -> String {
                hex::encode(&self.0[..4])
            }

            /// Parse from a hex string.
            pub fn from_hex(s: &str) -> Result<Self, TypeError> {
                let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
                if bytes.len() != 32 {
                    return Err(TypeError::InvalidLength {
                        expected: 32,
                        actual: bytes.len(),
                    });
                }
                let mut arr = [0u8; 32];
                arr.copy_from_slice(&bytes);
                Ok(Self(arr))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.short_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }
    };
}

digest_type!(
    /// BLAKE3 hash of the fields that make two items content-equal
    /// (title, subtitle, image, kind, action).
    ///
    /// Two content-equal items always share a signature. The converse only
    /// holds up to hash collisions, so callers that need certainty re-check
    /// with [`Item::content_eq`].
    ContentSignature
);

digest_type!(
    /// BLAKE3 hash of an ordered snapshot of items.
    ///
    /// Covers everything the diff classifier looks at: content fields, size,
    /// and relations. Meta values are not part of the fingerprint.
    Fingerprint
);

const SIGNATURE_DOMAIN: &str = "spots.item.content.v1";
const FINGERPRINT_DOMAIN: &str = "spots.snapshot.v1";

impl ContentSignature {
    /// Compute the content signature of an item.
    pub fn of(item: &Item) -> Self {
        let mut w = DigestWriter::new(SIGNATURE_DOMAIN);
        w.content(item);
        Self(w.finish())
    }
}

impl Fingerprint {
    /// Fingerprint an ordered slice of items.
    pub fn of(items: &[Item]) -> Self {
        Self::of_iter(items.len(), items.iter())
    }

    /// Fingerprint `len` items yielded in order by `items`.
    pub fn of_iter<'a, I>(len: usize, items: I) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut w = DigestWriter::new(FINGERPRINT_DOMAIN);
        w.u64(len as u64);
        for item in items {
            w.item(item);
        }
        Self(w.finish())
    }
}

/// Length-prefixed field writer over a BLAKE3 hasher.
struct DigestWriter {
    hasher: blake3::Hasher,
}

impl DigestWriter {
    fn new(domain: &str) -> Self {
        let mut w = Self {
            hasher: blake3::Hasher::new(),
        };
        w.str(domain);
        w
    }

    fn u64(&mut self, v: u64) {
        self.hasher.update(&v.to_le_bytes());
    }

    fn str(&mut self, s: &str) {
        self.u64(s.len() as u64);
        self.hasher.update(s.as_bytes());
    }

    fn content(&mut self, item: &Item) {
        self.str(&item.title);
        self.str(&item.subtitle);
        self.str(&item.image);
        self.str(&item.kind);
        match &item.action {
            Some(action) => {
                self.hasher.update(&[1]);
                self.str(action);
            }
            None => {
                self.hasher.update(&[0]);
            }
        }
    }

    fn item(&mut self, item: &Item) {
        self.content(item);
        self.u64(item.size.width.to_bits());
        self.u64(item.size.height.to_bits());
        self.u64(item.relations.len() as u64);
        for (key, children) in &item.relations {
            self.str(key);
            self.u64(children.len() as u64);
            // Relations compare by content, so only content goes in.
            for child in children {
                self.content(child);
            }
        }
    }

    fn finish(self) -> [u8; 32] {
        *self.hasher.finalize().as_bytes()
    }
}

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::OBJECT_ID_BYTES;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{Result, StoreError};
use bytes::Bytes;
use derive_new::new;
use sha1::{Digest, Sha1};
use std::io::BufRead;

/// Encodes an object's payload (without the `<type> <size>\0` header)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Decodes an object's payload; `oid` is only used for error reporting
pub trait Unpackable {
    fn deserialize(oid: &ObjectId, reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    fn object_id(&self) -> Result<ObjectId> {
        let payload = self.serialize()?;
        Ok(hash_object(self.object_type(), &payload))
    }

    fn to_raw(&self) -> Result<RawObject> {
        Ok(RawObject::new(self.object_type(), self.serialize()?))
    }
}

/// Compute the id of `payload` stored as an object of the given kind
///
/// The digest covers `"<kind> <len>\0"` followed by the payload bytes.
pub fn hash_object(kind: ObjectType, payload: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(header(kind, payload.len()));
    hasher.update(payload);

    let digest: [u8; OBJECT_ID_BYTES] = hasher.finalize().into();
    ObjectId::from_digest(&digest)
}

fn header(kind: ObjectType, len: usize) -> Vec<u8> {
    format!("{} {}\0", kind.as_str(), len).into_bytes()
}

/// An object as the store sees it: a kind tag and opaque payload bytes
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RawObject {
    pub kind: ObjectType,
    pub payload: Bytes,
}

impl RawObject {
    pub fn object_id(&self) -> ObjectId {
        hash_object(self.kind, &self.payload)
    }

    /// Header followed by payload, the exact bytes that get compressed on disk
    pub fn encode(&self) -> Bytes {
        let mut content = header(self.kind, self.payload.len());
        content.extend_from_slice(&self.payload);
        content.into()
    }

    /// Split stored bytes into kind and payload, checking them against `oid`
    pub fn decode(oid: &ObjectId, content: &[u8]) -> Result<Self> {
        let corrupt = |reason: &str| StoreError::Corrupt {
            oid: oid.clone(),
            reason: reason.to_string(),
        };

        let nul = content
            .iter()
            .position(|&byte| byte == 0)
            .ok_or_else(|| corrupt("missing header terminator"))?;
        let header =
            std::str::from_utf8(&content[..nul]).map_err(|_| corrupt("header is not utf-8"))?;
        let (kind, size) = header
            .split_once(' ')
            .ok_or_else(|| corrupt("header has no size"))?;

        let kind = ObjectType::from_name(kind).ok_or_else(|| corrupt("unknown object type"))?;
        let size = size
            .parse::<usize>()
            .map_err(|_| corrupt("header size is not a number"))?;

        let payload = &content[nul + 1..];
        if payload.len() != size {
            return Err(corrupt("payload length does not match header"));
        }

        let object = RawObject::new(kind, Bytes::copy_from_slice(payload));
        if &object.object_id() != oid {
            return Err(corrupt("content does not hash to its id"));
        }

        Ok(object)
    }
}

pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

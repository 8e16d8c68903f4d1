//! Commit object
//!
//! Commits record a snapshot of the repository at one point in time:
//! - A tree object ID (directory snapshot)
//! - The parent commit ID (absent for the first commit)
//! - Author and committer information
//! - Commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Result, StoreError};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::{BufRead, Read};

/// Author or committer signature: who and when
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    pub fn new(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Reject names and emails that would not read back from the signature line
    pub fn validate(&self) -> Result<()> {
        if self.name.trim() != self.name {
            return Err(StoreError::InvalidIdentity(format!(
                "name {:?} has surrounding whitespace",
                self.name
            )));
        }
        for (field, value) in [("name", &self.name), ("email", &self.email)] {
            if value.contains(['<', '>', '\n', '\0']) {
                return Err(StoreError::InvalidIdentity(format!(
                    "{field} {value:?} contains '<', '>', a newline or NUL"
                )));
            }
        }

        Ok(())
    }

    /// "Name <email> 1700000000 +0200", the form stored in commit objects
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    fn parse(value: &str) -> std::result::Result<Self, String> {
        // "name <email> timestamp timezone", split from the right
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(format!("invalid signature '{value}'"));
        }

        let offset = parse_offset(parts[0])?;
        let seconds = parts[1]
            .parse::<i64>()
            .map_err(|_| format!("invalid timestamp '{}'", parts[1]))?;
        let name_email = parts[2];

        let email_start = name_email
            .find('<')
            .ok_or_else(|| format!("missing '<' in '{name_email}'"))?;
        let email_end = name_email
            .rfind('>')
            .filter(|&end| end > email_start)
            .ok_or_else(|| format!("missing '>' in '{name_email}'"))?;

        let timestamp = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| format!("timestamp {seconds} is out of range"))?
            .with_timezone(&offset);

        Ok(Author {
            name: name_email[..email_start].trim().to_string(),
            email: name_email[email_start + 1..email_end].to_string(),
            timestamp,
        })
    }
}

/// Parse a `+HHMM` / `-HHMM` offset
fn parse_offset(raw: &str) -> std::result::Result<FixedOffset, String> {
    let invalid = || format!("invalid timezone '{raw}'");

    if raw.len() != 5 || !raw[1..].chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let sign = match &raw[..1] {
        "+" => 1,
        "-" => -1,
        _ => return Err(invalid()),
    };
    let hours: i32 = raw[1..3].parse().map_err(|_| invalid())?;
    let minutes: i32 = raw[3..5].parse().map_err(|_| invalid())?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Empty for the first commit. Only the first parent is used by this store.
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a commit; a trailing newline is added to the message if missing
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        committer: Author,
        message: &str,
    ) -> Self {
        let mut message = message.to_string();
        if !message.ends_with('\n') {
            message.push('\n');
        }

        Commit {
            parents: parent.into_iter().collect(),
            tree_oid,
            author,
            committer,
            message,
        }
    }

    /// First line of the message
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        Ok(Bytes::from(self.display()))
    }
}

impl Unpackable for Commit {
    fn deserialize(oid: &ObjectId, mut reader: impl BufRead) -> Result<Self> {
        let malformed = |reason: String| StoreError::MalformedObject {
            kind: "commit",
            oid: oid.clone(),
            reason,
        };

        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|_| malformed("payload is not utf-8".to_string()))?;

        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| malformed("missing blank line before message".to_string()))?;

        let mut tree_oid = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;

        for line in headers.lines() {
            let (key, value) = line
                .split_once(' ')
                .ok_or_else(|| malformed(format!("invalid header line '{line}'")))?;

            match key {
                "tree" => tree_oid = Some(
                    ObjectId::try_parse(value)
                        .map_err(|_| malformed(format!("invalid tree id '{value}'")))?,
                ),
                "parent" => parents.push(
                    ObjectId::try_parse(value)
                        .map_err(|_| malformed(format!("invalid parent id '{value}'")))?,
                ),
                "author" => author = Some(Author::parse(value).map_err(malformed)?),
                "committer" => committer = Some(Author::parse(value).map_err(malformed)?),
                // unknown headers (gpgsig, encoding, ...) are not interpreted
                _ => {}
            }
        }

        Ok(Commit {
            parents,
            tree_oid: tree_oid.ok_or_else(|| malformed("missing tree line".to_string()))?,
            author: author.ok_or_else(|| malformed("missing author line".to_string()))?,
            committer: committer
                .ok_or_else(|| malformed("missing committer line".to_string()))?,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid));
        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}

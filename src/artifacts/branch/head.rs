use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;

/// Where HEAD points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// HEAD is `ref: refs/heads/<branch>`; commits advance the branch
    Attached(BranchName),
    /// HEAD holds a commit id; commits advance HEAD alone
    Detached(ObjectId),
}

impl HeadState {
    pub fn branch(&self) -> Option<&BranchName> {
        match self {
            HeadState::Attached(branch) => Some(branch),
            HeadState::Detached(_) => None,
        }
    }
}

/// HEAD together with the commit it currently designates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHead {
    pub state: HeadState,
    pub oid: ObjectId,
}

use crate::node::{GroupMember, NodeGroup};

/// Packs members into groups whose combined text stays within
/// `chunk_size` characters.
///
/// Members keep their order. A member that would overflow the current
/// group starts the next one, so a single oversized member still gets a
/// group of its own.
pub fn group_members(members: Vec<GroupMember>, chunk_size: usize) -> Vec<NodeGroup> {
    let mut groups = Vec::new();
    let mut current = NodeGroup::default();
    let mut current_len = 0usize;

    for member in members {
        let member_len = member.text.chars().count();
        if !current.members.is_empty()
            && chunk_size > 0
            && current_len + member_len > chunk_size
        {
            groups.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current_len += member_len;
        current.members.push(member);
    }
    if !current.members.is_empty() {
        groups.push(current);
    }
    groups
}

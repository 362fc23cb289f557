/// A node in the connectivity DAG. Groups are allocated from a growable
/// arena indexed by `id`; `combined` is a union-find forwarding link
/// used to resolve edges through merges, and `next`/`prev` thread the live
/// list that gives the canonical iteration order.
#[derive(Debug, Clone)]
pub struct Group {
    pub id: usize,
    pub participants: Vec<usize>,
    /// Ids of groups this group has a decisive win against.
    pub beats: Vec<usize>,
    /// Ids of groups this group has decisively lost to.
    pub lost_to: Vec<usize>,
    /// Forwarding pointer set when this group is absorbed by another via
    /// `group_gocombine`. `None` means this group is its own representative.
    pub combined: Option<usize>,
    /// Set once this group has been emitted to the final ordering.
    pub isolated: bool,
    pub prev: Option<usize>,
    pub next: Option<usize>
}

impl Group {
    pub fn singleton(id: usize, participant: usize) -> Self {
        Group {
            id,
            participants: vec![participant],
            beats: Vec::new(),
            lost_to: Vec::new(),
            combined: None,
            isolated: false,
            prev: None,
            next: None
        }
    }
}

/// A fully resolved, emitted group, ready for the reporting layer: an
/// ordered list of groups, each with participant ids and inter-group
/// win/loss ids.
#[derive(Debug, Clone)]
pub struct FinalGroup {
    pub participants: Vec<usize>,
    pub beats: Vec<usize>,
    pub lost_to: Vec<usize>
}

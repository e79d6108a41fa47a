use std::fmt;
use std::path::PathBuf;

/// Position of a node in the four-level catalog hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Root,
    Brand,
    MaterialClass,
    FilamentType,
    Variant,
    /// Anything below a variant (never produced by the catalog layout).
    Nested,
}

/// Identifies a catalog node by its path segments, relative to the store root.
///
/// `NodePath` never contains empty, `.` or `..` segments; [`NodePath::parse`]
/// drops them.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = Self::root();
        for segment in segments {
            path.push(segment);
        }
        path
    }

    /// Parse a `/`-separated relative path such as `brand/PLA/pla/red`.
    pub fn parse(rel: &str) -> Self {
        Self::new(rel.replace('\\', "/").split('/'))
    }

    fn push(&mut self, segment: impl Into<String>) {
        let segment = segment.into();
        if segment.is_empty() || segment == "." || segment == ".." {
            return;
        }
        self.segments.push(segment);
    }

    pub fn join(&self, name: impl Into<String>) -> Self {
        let mut joined = self.clone();
        joined.push(name);
        joined
    }

    /// Same parent, different final segment.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        match self.parent() {
            Some(parent) => parent.join(name),
            None => Self::root().join(name),
        }
    }

    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn level(&self) -> Level {
        match self.segments.len() {
            0 => Level::Root,
            1 => Level::Brand,
            2 => Level::MaterialClass,
            3 => Level::FilamentType,
            4 => Level::Variant,
            _ => Level::Nested,
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// True for `self == other` as well as for strict ancestors.
    pub fn contains(&self, other: &NodePath) -> bool {
        other.segments.len() >= self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }

    /// Re-root `self` from under `from` to under `to`.
    pub fn rebase(&self, from: &NodePath, to: &NodePath) -> Option<Self> {
        if !from.contains(self) {
            return None;
        }
        let mut rebased = to.clone();
        for segment in &self.segments[from.segments.len()..] {
            rebased.push(segment.clone());
        }
        Some(rebased)
    }

    pub fn to_relative(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl From<&str> for NodePath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_drops_empty_and_dot_segments() {
        let path = NodePath::parse("./acme//PLA/../pla/");
        assert_eq!(path.segments(), &["acme", "PLA", "pla"]);
        assert_eq!(path.to_string(), "acme/PLA/pla");
    }

    #[test]
    fn level_follows_depth() {
        assert_eq!(NodePath::root().level(), Level::Root);
        assert_eq!(NodePath::parse("acme/PLA").level(), Level::MaterialClass);
        assert_eq!(NodePath::parse("acme/PLA/pla/red").level(), Level::Variant);
    }

    #[test]
    fn rebase_moves_descendants() {
        let from = NodePath::parse("acme/PLA/pla/red");
        let to = NodePath::parse("acme/PLA/silk_pla/red");
        let doc_dir = NodePath::parse("acme/PLA/pla/red/extra");
        assert_eq!(
            doc_dir.rebase(&from, &to),
            Some(NodePath::parse("acme/PLA/silk_pla/red/extra"))
        );
        assert_eq!(NodePath::parse("acme/PLA/pla/blue").rebase(&from, &to), None);
    }

    #[test]
    fn contains_does_not_match_name_prefixes() {
        let red = NodePath::parse("acme/PLA/pla/red");
        assert!(!red.contains(&NodePath::parse("acme/PLA/pla/red_matte")));
        assert!(NodePath::parse("acme/PLA").contains(&red));
    }

    #[test]
    fn with_name_keeps_parent() {
        let path = NodePath::parse("acme/PLA/pla/hf_red");
        assert_eq!(path.with_name("red").to_string(), "acme/PLA/pla/red");
    }
}

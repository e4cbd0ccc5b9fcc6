use core::fmt;

/// A notification recorded while the tree is being mutated.
///
/// The tree never writes these anywhere; [`insert`] and [`delete`] hand them back to the
/// caller in the order they occurred.
///
/// [`insert`]: crate::AvlTree::insert
/// [`delete`]: crate::AvlTree::delete
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// An insertion descended through `parent` on its way to placing `child`.
    Welcomed { parent: String, child: String },
    /// `label` was removed and its position taken by `replacement`, if any.
    Departed {
        label: String,
        replacement: Option<String>,
    },
}

impl Event {
    pub(crate) fn welcomed(parent: &str, child: &str) -> Event {
        Event::Welcomed {
            parent: parent.to_owned(),
            child: child.to_owned(),
        }
    }

    pub(crate) fn departed(label: &str, replacement: Option<&str>) -> Event {
        Event::Departed {
            label: label.to_owned(),
            replacement: replacement.map(str::to_owned),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Welcomed { parent, child } => write!(f, "{parent} welcomed {child}"),
            Event::Departed { label, replacement } => write!(
                f,
                "{label} left the family, replaced by {}",
                replacement.as_deref().unwrap_or("nobody")
            ),
        }
    }
}

/// The result of an [`insert`] or [`delete`].
///
/// [`insert`]: crate::AvlTree::insert
/// [`delete`]: crate::AvlTree::delete
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct Outcome {
    /// `false` if the operation was a no-op: a duplicate insert or the removal of an absent
    /// weight.
    pub applied: bool,
    pub events: Vec<Event>,
}

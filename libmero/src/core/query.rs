//! utilities for filtering and sorting in-memory collections
//!
use std::{cmp::Ordering, ops::Deref, sync::Arc};

pub mod filter {
    use super::DynFilterPart;

    /// An operator for combining filter parts to form a more complex filter expression
    #[derive(Clone, Debug)]
    pub enum Op {
        Or,
        And,
    }

    #[derive(Clone)]
    /// An object that allows you easily build compound filters that can be applied to a
    /// collection of items
    pub struct CompoundFilterBuilder<T> {
        pub(crate) top: CompoundFilter<T>,
    }

    pub fn and<T: 'static>() -> CompoundFilterBuilder<T> {
        CompoundFilterBuilder::new(Op::And)
    }

    pub fn or<T: 'static>() -> CompoundFilterBuilder<T> {
        CompoundFilterBuilder::new(Op::Or)
    }

    impl<T: 'static> CompoundFilterBuilder<T> {
        /// Create a new [CompoundFilterBuilder] object that will combine all filter
        /// expressions using the given operator
        pub fn new(op: Op) -> Self {
            Self {
                top: CompoundFilter::new(op),
            }
        }

        /// Add a new filter expression to this compound filter. It will be combined
        /// with all existing filter expressions using the operator that was specified in
        /// the constructor.
        pub fn push<F: Into<DynFilterPart<T>>>(mut self, filter: F) -> Self {
            self.top.add_filter(filter.into());
            self
        }

        /// Like [CompoundFilterBuilder::push()], but does nothing when `filter` is `None`
        pub fn push_opt<F: Into<DynFilterPart<T>>>(self, filter: Option<F>) -> Self {
            match filter {
                Some(f) => self.push(f),
                None => self,
            }
        }

        /// Generate a new [CompoundFilter] object from this builder object
        pub fn build(self) -> DynFilterPart<T> {
            self.top.into()
        }
    }

    /// A Trait implemented by anything that can be a filter. It could be a single field or a
    /// multi-level compound filter condition.
    pub trait FilterPart<T>: Send + Sync {
        /// returns true if the given item satisfies this filter condition
        fn matches(&self, item: &T) -> bool;
    }

    /// An object that represents one or more filter conditions that are combined by a single
    /// logical operator ([Op]). Multiple compound filters can be combined together into larger
    /// filter conditions
    pub struct CompoundFilter<T> {
        pub(crate) conditions: Vec<DynFilterPart<T>>,
        pub(crate) op: Op,
    }

    impl<T> Clone for CompoundFilter<T> {
        fn clone(&self) -> Self {
            Self {
                conditions: self.conditions.clone(),
                op: self.op.clone(),
            }
        }
    }

    impl<T: 'static> CompoundFilter<T> {
        /// Create a new compound filter object
        pub fn new(op: Op) -> Self {
            Self {
                conditions: Default::default(),
                op,
            }
        }

        /// Create an builder object that is used for building compound filters
        pub fn builder(op: Op) -> CompoundFilterBuilder<T> {
            CompoundFilterBuilder::new(op)
        }

        /// Add a new filter expression to the current filter. It will be combined
        /// with the operator [Op] that was specified in [CompoundFilter::new()]
        pub fn add_filter(&mut self, filter: DynFilterPart<T>) {
            self.conditions.push(filter);
        }
    }

    impl<T> FilterPart<T> for CompoundFilter<T> {
        fn matches(&self, item: &T) -> bool {
            // an empty filter places no constraint on the item, regardless of the operator
            if self.conditions.is_empty() {
                return true;
            }

            match self.op {
                Op::And => self.conditions.iter().all(|cond| cond.matches(item)),
                Op::Or => self.conditions.iter().any(|cond| cond.matches(item)),
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    /// An object representing the comparison operator that is used in a filter expression
    pub enum Cmp {
        Equal,
        NotEqual,
        Like,
        LessThan,
        GreaterThan,
        NotGreaterThan,
        NotLessThan,
    }

    impl Cmp {
        /// Compare `value` against `other`. [Cmp::Like] behaves like [Cmp::Equal] for values
        /// that are not strings
        pub fn compare<V: PartialOrd + ?Sized>(&self, value: &V, other: &V) -> bool {
            match self {
                Cmp::Equal | Cmp::Like => value == other,
                Cmp::NotEqual => value != other,
                Cmp::LessThan => value < other,
                Cmp::GreaterThan => value > other,
                Cmp::NotGreaterThan => value <= other,
                Cmp::NotLessThan => value >= other,
            }
        }

        /// Compare two strings without regard to case. [Cmp::Like] matches when `pattern`
        /// appears anywhere within `value`.
        pub fn compare_str(&self, value: &str, pattern: &str) -> bool {
            let value = value.to_lowercase();
            let pattern = pattern.to_lowercase();
            match self {
                Cmp::Like => value.contains(&pattern),
                _ => self.compare(value.as_str(), pattern.as_str()),
            }
        }
    }
}

/// The direction in which items are sorted
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// a trait implemented by the sortable fields of a type
pub trait SortKey<T> {
    /// compare two items by this field in ascending order
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// A type for specifying how a collection of items should be sorted
#[derive(Clone, Debug)]
pub struct SortSpec<F> {
    /// The field that items should be sorted on. The type must implement [SortKey]
    pub field: F,
    /// The direction to sort items
    pub direction: Direction,
}

impl<F> SortSpec<F> {
    pub fn new(field: F, direction: Direction) -> Self {
        Self { field, direction }
    }

    pub fn compare<T>(&self, a: &T, b: &T) -> Ordering
    where
        F: SortKey<T>,
    {
        match self.direction {
            Direction::Ascending => self.field.compare(a, b),
            Direction::Descending => self.field.compare(b, a),
        }
    }
}

/// A type representing an ordered list of multiple sort specifications. Later specifications are
/// only consulted when all earlier ones compare equal.
#[derive(Clone, Debug)]
pub struct SortSpecs<F>(pub Vec<SortSpec<F>>);

impl<F> SortSpecs<F> {
    /// Sort the given items in place. The sort is stable: items that compare equal on every
    /// specification keep their relative order.
    pub fn sort<T>(&self, items: &mut [&T])
    where
        F: SortKey<T>,
    {
        items.sort_by(|a, b| {
            self.0
                .iter()
                .map(|spec| spec.compare(*a, *b))
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });
    }
}

impl<F> From<SortSpec<F>> for SortSpecs<F> {
    fn from(value: SortSpec<F>) -> Self {
        SortSpecs(vec![value])
    }
}

pub struct DynFilterPart<T>(Arc<dyn filter::FilterPart<T>>);

impl<T> Clone for DynFilterPart<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for DynFilterPart<T> {
    type Target = Arc<dyn filter::FilterPart<T>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DynFilterPart<T> {
    pub fn new<F: filter::FilterPart<T> + 'static>(filter: F) -> Self {
        DynFilterPart(Arc::new(filter))
    }
}

impl<T: 'static> From<filter::CompoundFilter<T>> for DynFilterPart<T> {
    fn from(value: filter::CompoundFilter<T>) -> Self {
        Self::new(value)
    }
}

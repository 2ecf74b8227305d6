use crate::models::tmplvar::TmplVar;

/// A template's TV bindings split by whether the TV sits in a category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition<'a> {
    pub grouped: Vec<&'a TmplVar>,
    pub ungrouped: Vec<&'a TmplVar>,
}

impl Partition<'_> {
    pub fn grouped_ids(&self) -> Vec<i64> {
        self.grouped.iter().map(|tv| tv.id).collect()
    }

    pub fn ungrouped_ids(&self) -> Vec<i64> {
        self.ungrouped.iter().map(|tv| tv.id).collect()
    }
}

/// Split bound TVs into grouped and ungrouped, keeping binding order.
/// Every TV lands in exactly one side.
pub fn partition(tvs: &[TmplVar]) -> Partition<'_> {
    let (grouped, ungrouped): (Vec<&TmplVar>, Vec<&TmplVar>) =
        tvs.iter().partition(|tv| tv.is_grouped());
    Partition { grouped, ungrouped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn tv(id: i64, category: i64) -> TmplVar {
        TmplVar {
            id,
            name: format!("tv{id}"),
            category,
            ..Default::default()
        }
    }

    #[test]
    fn test_partition_is_disjoint_and_exhaustive() {
        let tvs = vec![tv(1, 0), tv(2, 4), tv(3, 0), tv(4, 9), tv(5, 4)];
        let split = partition(&tvs);

        assert_eq!(split.ungrouped_ids(), vec![1, 3]);
        assert_eq!(split.grouped_ids(), vec![2, 4, 5]);

        let grouped: BTreeSet<i64> = split.grouped_ids().into_iter().collect();
        let ungrouped: BTreeSet<i64> = split.ungrouped_ids().into_iter().collect();
        let all: BTreeSet<i64> = tvs.iter().map(|t| t.id).collect();
        assert!(grouped.is_disjoint(&ungrouped));
        assert_eq!(&grouped | &ungrouped, all);
    }

    #[test]
    fn test_partition_of_nothing_is_empty() {
        let split = partition(&[]);
        assert!(split.grouped.is_empty());
        assert!(split.ungrouped.is_empty());
    }
}

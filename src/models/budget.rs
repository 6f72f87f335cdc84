use rust_decimal::Decimal;

/// Monthly spending limits: one overall limit plus optional per-category limits.
///
/// Category limits keep the order they were first set in; progress is
/// reported in that order. Names match expense categories exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BudgetConfig {
    pub(crate) overall: Decimal,
    pub(crate) categories: Vec<(String, Decimal)>,
}

impl BudgetConfig {
    pub(crate) fn new(overall: Decimal) -> Self {
        Self {
            overall,
            categories: Vec::new(),
        }
    }

    pub(crate) fn category_limit(&self, name: &str) -> Option<Decimal> {
        self.categories
            .iter()
            .find(|(c, _)| c == name)
            .map(|(_, limit)| *limit)
    }

    /// Set a category limit, replacing an existing entry in place.
    pub(crate) fn set_category_limit(&mut self, name: &str, limit: Decimal) {
        match self.categories.iter_mut().find(|(c, _)| c == name) {
            Some(entry) => entry.1 = limit,
            None => self.categories.push((name.to_string(), limit)),
        }
    }

    /// Returns true if an entry was removed.
    pub(crate) fn remove_category(&mut self, name: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|(c, _)| c != name);
        self.categories.len() != before
    }
}

use crate::api::models::{Lead, LeadStatus};

/// Status selector of the dashboard: everything, or one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(LeadStatus),
}

impl StatusFilter {
    /// Chip order on the dashboard.
    pub const CHOICES: [StatusFilter; 6] = [
        StatusFilter::All,
        StatusFilter::Only(LeadStatus::Pending),
        StatusFilter::Only(LeadStatus::Contacted),
        StatusFilter::Only(LeadStatus::Recontact),
        StatusFilter::Only(LeadStatus::Won),
        StatusFilter::Only(LeadStatus::Lost),
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All Leads",
            StatusFilter::Only(status) => status.label(),
        }
    }

    pub fn accepts(self, status: LeadStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

/// Search term plus status selector. Owned by one dashboard window and
/// dropped with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    search: String,
    pub status: StatusFilter,
}

impl ViewFilter {
    pub fn new(search: &str, status: StatusFilter) -> Self {
        let mut filter = Self { search: String::new(), status };
        filter.set_search(search);
        filter
    }

    /// Stored lowercased; matching is case-insensitive.
    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_lowercase();
    }

    fn matches_text(&self, lead: &Lead) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let hit = |field: &str| field.to_lowercase().contains(&self.search);
        hit(lead.name.as_str()) || hit(lead.email.as_str()) || lead.phone.as_deref().is_some_and(hit)
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        self.status.accepts(lead.status) && self.matches_text(lead)
    }

    /// The visible subset, in source order. Recomputed on every call.
    pub fn apply<'a>(&self, leads: &'a [Lead]) -> Vec<&'a Lead> {
        leads.iter().filter(|lead| self.matches(lead)).collect()
    }
}

/// Header counters. Always computed over the full list, never the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub pending: usize,
    pub won: usize,
}

impl Stats {
    pub fn of(leads: &[Lead]) -> Self {
        let count = |status| leads.iter().filter(|l| l.status == status).count();
        Self {
            total: leads.len(),
            pending: count(LeadStatus::Pending),
            won: count(LeadStatus::Won),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(id: i64, name: &str, email: &str, phone: Option<&str>, status: LeadStatus) -> Lead {
        Lead {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.map(str::to_string),
            content: String::new(),
            created_at: String::new(),
            status,
        }
    }

    fn ids(leads: Vec<&Lead>) -> Vec<i64> {
        leads.into_iter().map(|l| l.id).collect()
    }

    fn sample() -> Vec<Lead> {
        vec![
            lead(1, "Ann", "a@x.com", None, LeadStatus::Pending),
            lead(2, "Bo", "b@x.com", None, LeadStatus::Won),
        ]
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let leads = sample();
        let filter = ViewFilter::new("an", StatusFilter::All);
        assert_eq!(ids(filter.apply(&leads)), vec![1]);
        let filter = ViewFilter::new("ANN", StatusFilter::All);
        assert_eq!(ids(filter.apply(&leads)), vec![1]);
    }

    #[test]
    fn status_only_filter() {
        let leads = sample();
        let filter = ViewFilter::new("", StatusFilter::Only(LeadStatus::Won));
        assert_eq!(ids(filter.apply(&leads)), vec![2]);
    }

    #[test]
    fn search_covers_email_and_phone() {
        let leads = vec![
            lead(1, "Ann", "sales@ACME.com", None, LeadStatus::Pending),
            lead(2, "Bo", "b@x.com", Some("+1 555 0100"), LeadStatus::Contacted),
            lead(3, "Cy", "c@x.com", Some(""), LeadStatus::Lost),
        ];
        assert_eq!(ids(ViewFilter::new("acme", StatusFilter::All).apply(&leads)), vec![1]);
        assert_eq!(ids(ViewFilter::new("555", StatusFilter::All).apply(&leads)), vec![2]);
        assert_eq!(ids(ViewFilter::new("x.com", StatusFilter::All).apply(&leads)), vec![2, 3]);
    }

    #[test]
    fn phone_is_searched_as_stored() {
        let leads = vec![
            lead(1, "Ann", "a@x.com", Some("555 0100 "), LeadStatus::Pending),
            lead(2, "Bo", "b@x.com", Some(" 777"), LeadStatus::Pending),
        ];
        assert_eq!(ids(ViewFilter::new("0100 ", StatusFilter::All).apply(&leads)), vec![1]);
        assert_eq!(ids(ViewFilter::new(" 77", StatusFilter::All).apply(&leads)), vec![2]);
    }

    #[test]
    fn both_conditions_must_hold_and_order_is_kept() {
        let leads = vec![
            lead(5, "Dana", "d@x.com", None, LeadStatus::Won),
            lead(3, "Dan", "dan@x.com", None, LeadStatus::Pending),
            lead(9, "Daniel", "dl@x.com", None, LeadStatus::Won),
        ];
        let filter = ViewFilter::new("dan", StatusFilter::Only(LeadStatus::Won));
        assert_eq!(ids(filter.apply(&leads)), vec![5, 9]);
        let filter = ViewFilter::new("zzz", StatusFilter::All);
        assert!(filter.apply(&leads).is_empty());
    }

    #[test]
    fn stats_ignore_the_view() {
        let leads = vec![
            lead(1, "A", "a@x", None, LeadStatus::Pending),
            lead(2, "B", "b@x", None, LeadStatus::Pending),
            lead(3, "C", "c@x", None, LeadStatus::Won),
            lead(4, "D", "d@x", None, LeadStatus::Lost),
        ];
        let stats = Stats::of(&leads);
        assert_eq!(stats, Stats { total: 4, pending: 2, won: 1 });
        let narrowed = ViewFilter::new("a", StatusFilter::Only(LeadStatus::Pending));
        assert_eq!(narrowed.apply(&leads).len(), 1);
        assert_eq!(Stats::of(&leads), stats);
    }

    #[test]
    fn chip_labels() {
        let labels: Vec<_> = StatusFilter::CHOICES.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            ["All Leads", "Pending", "Contacted", "Re-contact", "Won (Client)", "Lost"]
        );
    }
}

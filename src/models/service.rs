use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub duration_minutes: u32,
}

const COMBO_ID: &str = "manicure_pedicure";
const COMBO_PARTS: [&str; 2] = ["manicure", "pedicure"];

static CATALOG: [Service; 4] = [
    Service {
        id: "manicure",
        name: "Manicure",
        price: 20.0,
        duration_minutes: 60,
    },
    Service {
        id: "pedicure",
        name: "Pedicure",
        price: 20.0,
        duration_minutes: 60,
    },
    Service {
        id: COMBO_ID,
        name: "Manicure + Pedicure",
        price: 40.0,
        duration_minutes: 120,
    },
    Service {
        id: "spa",
        name: "Foot Spa",
        price: 35.0,
        duration_minutes: 60,
    },
];

pub fn catalog() -> &'static [Service] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static Service> {
    CATALOG.iter().find(|s| s.id == id)
}

/// Services picked in the wizard, in selection order.
#[derive(Debug, Clone, Default)]
pub struct ServiceSelection {
    selected: Vec<&'static Service>,
}

impl ServiceSelection {
    /// Resolves a list of ids, applying the same rules as toggling each in
    /// turn. Unknown ids are reported back.
    pub fn from_ids<'a, I>(ids: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut selection = Self::default();
        for id in ids {
            let id = id.trim();
            if id.is_empty() {
                continue;
            }
            if find(id).is_none() {
                return Err(format!("unknown service: {id}"));
            }
            if !selection.contains(id) {
                selection.toggle(id);
            }
        }
        Ok(selection)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s.id == id)
    }

    /// Selects or deselects a service. The combo and its parts exclude each
    /// other.
    pub fn toggle(&mut self, id: &str) {
        if self.contains(id) {
            self.selected.retain(|s| s.id != id);
            return;
        }
        let Some(service) = find(id) else {
            return;
        };
        if id == COMBO_ID {
            self.selected.retain(|s| !COMBO_PARTS.contains(&s.id));
        } else if COMBO_PARTS.contains(&id) {
            self.selected.retain(|s| s.id != COMBO_ID);
        }
        self.selected.push(service);
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn total_cost(&self) -> f64 {
        self.selected.iter().map(|s| s.price).sum()
    }

    pub fn total_duration(&self) -> u32 {
        self.selected.iter().map(|s| s.duration_minutes).sum()
    }

    pub fn service_names(&self) -> Vec<String> {
        self.selected.iter().map(|s| s.name.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(catalog().len(), 4);
        assert_eq!(find("spa").map(|s| s.duration_minutes), Some(60));
        assert!(find("haircut").is_none());
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut sel = ServiceSelection::default();
        sel.toggle("manicure");
        sel.toggle("spa");
        assert_eq!(sel.total_duration(), 120);
        assert_eq!(sel.total_cost(), 55.0);
        sel.toggle("spa");
        assert_eq!(sel.service_names(), vec!["Manicure"]);
    }

    #[test]
    fn test_combo_replaces_parts() {
        let mut sel = ServiceSelection::default();
        sel.toggle("manicure");
        sel.toggle("pedicure");
        sel.toggle("manicure_pedicure");
        assert_eq!(sel.service_names(), vec!["Manicure + Pedicure"]);
        assert_eq!(sel.total_duration(), 120);
    }

    #[test]
    fn test_part_replaces_combo() {
        let mut sel = ServiceSelection::default();
        sel.toggle("manicure_pedicure");
        sel.toggle("spa");
        sel.toggle("pedicure");
        assert_eq!(sel.service_names(), vec!["Foot Spa", "Pedicure"]);
        assert_eq!(sel.total_cost(), 55.0);
    }

    #[test]
    fn test_toggle_unknown_is_ignored() {
        let mut sel = ServiceSelection::default();
        sel.toggle("haircut");
        assert!(sel.is_empty());
    }

    #[test]
    fn test_from_ids() {
        let sel = ServiceSelection::from_ids("manicure,spa,manicure".split(',')).unwrap();
        assert_eq!(sel.total_duration(), 120);
        assert!(ServiceSelection::from_ids(["nails"]).is_err());
        assert!(ServiceSelection::from_ids(["", " "]).unwrap().is_empty());
    }
}

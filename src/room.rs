//! Free-text room name classification.
//!
//! Property rule tables key rows by canonical room type ("bedroom",
//! "bathroom", ...) and an optional subtype ("master", "attached"). User
//! input arrives as free text ("Master Bed Room", "2nd kids bedroom"), so
//! the classifier maps labels onto the canonical vocabulary and passes
//! unrecognized labels through untouched, which keeps fallback rule lookups
//! possible for any non-empty input.

/// Canonical room vocabulary. `Other` carries the trimmed lowercased input
/// for labels outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomKind {
    Bedroom,
    Bathroom,
    Living,
    Kitchen,
    Dining,
    Balcony,
    Foyer,
    Study,
    Utility,
    Garden,
    Other(String),
}

impl RoomKind {
    /// The canonical string form, as stored in rule-table `room_type`
    /// columns. `Other` yields the raw lowercased label.
    pub fn as_str(&self) -> &str {
        match self {
            RoomKind::Bedroom => "bedroom",
            RoomKind::Bathroom => "bathroom",
            RoomKind::Living => "living",
            RoomKind::Kitchen => "kitchen",
            RoomKind::Dining => "dining",
            RoomKind::Balcony => "balcony",
            RoomKind::Foyer => "foyer",
            RoomKind::Study => "study",
            RoomKind::Utility => "utility",
            RoomKind::Garden => "garden",
            RoomKind::Other(label) => label,
        }
    }
}

impl std::fmt::Display for RoomKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified room label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomClass {
    pub kind: RoomKind,
    pub subtype: Option<String>,
}

impl RoomClass {
    fn new(kind: RoomKind, subtype: Option<&str>) -> Self {
        Self {
            kind,
            subtype: subtype.map(str::to_owned),
        }
    }
}

/// Classify a free-text room label.
///
/// Case-insensitive substring tests in fixed priority order: bedroom
/// patterns first (master > guest > kids > generic), bathroom next
/// (attached/ensuite > common/shared > powder > generic), then the
/// remaining room types as flat alternatives. The first match wins. A label
/// matching nothing classifies as [`RoomKind::Other`] with the trimmed
/// lowercase input, so every non-empty label gets a classification. Only
/// empty/whitespace input returns `None`.
pub fn classify(name: &str) -> Option<RoomClass> {
    let label = name.trim().to_lowercase();
    if label.is_empty() {
        return None;
    }

    let has = |needles: &[&str]| needles.iter().any(|n| label.contains(n));

    if has(&["bed"]) {
        let subtype = if has(&["master", "primary"]) {
            Some("master")
        } else if has(&["guest"]) {
            Some("guest")
        } else if has(&["kid", "child"]) {
            Some("kids")
        } else {
            None
        };
        return Some(RoomClass::new(RoomKind::Bedroom, subtype));
    }

    if has(&["bath", "washroom", "toilet", "restroom", "powder"]) {
        let subtype = if has(&["attach", "ensuite", "en-suite", "en suite"]) {
            Some("attached")
        } else if has(&["common", "shared"]) {
            Some("common")
        } else if has(&["powder"]) {
            Some("powder")
        } else {
            None
        };
        return Some(RoomClass::new(RoomKind::Bathroom, subtype));
    }

    let flat: [(RoomKind, &[&str]); 8] = [
        (RoomKind::Living, &["living", "hall", "lounge", "drawing"]),
        (RoomKind::Kitchen, &["kitchen"]),
        (RoomKind::Dining, &["dining", "dinning"]),
        (RoomKind::Balcony, &["balcony", "sitout", "sit out"]),
        (RoomKind::Foyer, &["foyer", "entrance", "entry"]),
        (RoomKind::Study, &["study", "office"]),
        (RoomKind::Utility, &["utility", "laundry"]),
        (RoomKind::Garden, &["garden", "lawn", "backyard"]),
    ];
    for (kind, needles) in flat {
        if has(needles) {
            return Some(RoomClass::new(kind, None));
        }
    }

    // Unrecognized passthrough: the label itself becomes the type.
    Some(RoomClass::new(RoomKind::Other(label), None))
}

//! Pure derivation rules for turning domain events into recommendations

use crate::domain::events::EventKind;

const CLASS_PLACEHOLDER: &str = "{class}";

/// Message template and priority attached to one event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindRule {
    pub priority: u8,
    pub template: &'static str,
}

impl KindRule {
    pub fn render(&self, class_name: &str) -> String {
        self.template.replace(CLASS_PLACEHOLDER, class_name)
    }
}

/// The rule table; the match keeps it total over `EventKind`
pub fn rule_for(kind: EventKind) -> KindRule {
    match kind {
        EventKind::SlotFreed => KindRule {
            priority: 1,
            template: "A spot opened up in {class}! Book now before it fills again.",
        },
        EventKind::ScheduleChanged => KindRule {
            priority: 2,
            template: "Schedule change for {class}. Check your agenda so you don't miss it.",
        },
        EventKind::ClassFull => KindRule {
            priority: 3,
            template: "{class} is full. Try another class or wait for a spot to open.",
        },
        EventKind::BookingCreated => KindRule {
            priority: 4,
            template: "Booking confirmed for {class}. See you there!",
        },
        EventKind::BookingCancelled => KindRule {
            priority: 4,
            template: "A spot was released in {class}. Grab it while you can!",
        },
    }
}

pub fn priority_for(kind: EventKind) -> u8 {
    rule_for(kind).priority
}

pub fn message_for(kind: EventKind, class_name: &str) -> String {
    rule_for(kind).render(class_name)
}

/// Known class-code prefixes and their display labels
const CLASS_LABELS: &[(&str, &str)] = &[
    ("YOGA", "Yoga"),
    ("PILATES", "Pilates"),
    ("SPINNING", "Spinning"),
    ("BOX", "Boxing"),
    ("ZUMBA", "Zumba"),
    ("CROSSFIT", "CrossFit"),
    ("HIIT", "HIIT"),
    ("KICKBOXING", "Kickboxing"),
    ("AEROBIC", "Aerobics"),
    ("DANCE", "Dance"),
    ("MEDITATION", "Meditation"),
    ("STRETCHING", "Stretching"),
    ("FUNCTIONAL", "Functional Training"),
    ("CALISTHENICS", "Calisthenics"),
    ("WELLNESS", "Wellness"),
];

const UNKNOWN_CLASS: &str = "Unknown class";

/// Numeric class ids are resolved through the class catalog
pub fn numeric_class_id(class_id: &str) -> Option<i64> {
    class_id.parse::<i64>().ok()
}

/// Display name for a non-numeric class code such as `YOGA-101`
///
/// The token before the first `-` is looked up in the label table;
/// unknown tokens are capitalized as-is.
pub fn friendly_class_name(class_id: &str) -> String {
    let token = class_id.split('-').next().unwrap_or_default().trim();
    if token.is_empty() {
        return UNKNOWN_CLASS.to_string();
    }

    let upper = token.to_uppercase();
    CLASS_LABELS
        .iter()
        .find(|(prefix, _)| *prefix == upper)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| capitalize(token))
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

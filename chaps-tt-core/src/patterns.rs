//! Keyword lists that separate genuine stop names from the other text packed into a `.tt` file:
//! service-day legends, tariff notes, copyright strings and points of interest.
//!
//! The lists were collected by inspecting decoded files and are deliberately
//! lowercase; matching happens on lowercased input. They are not complete,
//! only good enough to push junk candidates below real ones.

/// Phrases from service-day legends and footnotes, in the four languages
/// that show up in the national data set (Czech, Slovak, German, English).
pub const SERVICE_TEXT_KEYWORDS: &[&str] = &[
    "arbeitstage",
    "working day",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "jede",
    "premáva",
    "montag",
    "dienstag",
    "mittwoch",
    "donnerstag",
    "freitag",
    "samstag",
    "sonntag",
    "pondělí",
    "úterý",
    "středu",
    "čtvrtek",
    "pátek",
    "sobotu",
    "neděli",
    "pracovních dnech",
    "pondelok",
    "utorok",
    "stredu",
    "štvrtok",
    "piatok",
    "nedeľu",
    "pracovných dňoch",
    "jede v",
    "státem uznané svátky",
    "štátom uznané sviatky",
    "platzreservierung",
    "místenku",
    "rezervace",
    "rezervácia",
    "bezbariéro",
    "občerstven",
    "na znamení",
    "na znamenie",
    "integrovanej dopravy",
    "svátek",
    "sviat",
];

/// Markers of URL, copyright and other vendor strings that never name a stop.
pub const BAD_STOP_KEYWORDS: &[&str] = &[
    "copyright",
    "http://",
    "https://",
    "internet",
    "pid.tt",
];

/// Fragments of per-route notes: tariff text, payment info, line remarks.
pub const STOP_NOTE_KEYWORDS: &[&str] = &[
    "{l}",
    "¤¤",
    "spoj ",
    "linka ",
    "jede jen",
    "tarif",
    "přeprav",
    "preprav",
    "ceník",
    "cenník",
    "informace",
    "vozidlech",
    "zvýhodně",
    "zvyhodne",
    "bankovní",
    "bankovu",
    "na lince platí",
];

/// Points of interest (banks, branches) that the vendor mixes into some
/// stop tables.
pub const POI_KEYWORDS: &[&str] = &[
    "unicredit",
    "spořitelna",
    "sporitelna",
    "pobočka",
    "pobocka",
    "a.s.",
    "bankomat",
    "banka,",
    "bank,",
];

fn contains_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| lowered.contains(kw))
}

/// Whether the name reads like a service-day legend rather than a stop.
pub fn is_service_text(name: &str) -> bool {
    contains_any(&name.to_lowercase(), SERVICE_TEXT_KEYWORDS)
}

/// Whether the name carries a vendor/copyright marker.
pub fn is_vendor_text(name: &str) -> bool {
    contains_any(&name.to_lowercase(), BAD_STOP_KEYWORDS)
}

/// Whether the name reads like a route note.
pub fn is_route_note(name: &str) -> bool {
    contains_any(&name.to_lowercase(), STOP_NOTE_KEYWORDS)
}

/// Whether the name matches a point-of-interest marker.
pub fn is_poi(name: &str) -> bool {
    contains_any(&name.to_lowercase(), POI_KEYWORDS)
}

/// The full bad-stop predicate applied when scrubbing a selected table.
///
/// Catches empty names, legend markup (`¤¤` prefix, `{L}` tokens), the short
/// starred control strings used internally by the vendor, service-day
/// legends and points of interest.
pub fn is_bad_stop_name(name: &str) -> bool {
    if name.trim().is_empty() {
        return true;
    }
    if name.starts_with("¤¤") {
        return true;
    }
    if name.contains("{L}") || name.contains("{l}") {
        return true;
    }
    if let Some(rest) = name.strip_prefix('*') {
        if !rest.is_empty() && name.chars().count() <= 6 && rest.chars().all(char::is_alphabetic) {
            return true;
        }
    }
    is_service_text(name) || is_poi(name)
}

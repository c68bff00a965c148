use ahash::HashMap;
use std::sync::LazyLock;

/// Best-known makespans for the classic benchmark sets (Fisher-Thompson and
/// Lawrence), keyed by instance name.
static BEST_KNOWN: LazyLock<HashMap<&'static str, u64>> = LazyLock::new(|| {
    [
        ("ft06", 55),
        ("ft10", 930),
        ("ft20", 1165),
        ("la01", 666),
        ("la02", 655),
        ("la03", 597),
        ("la04", 590),
        ("la05", 593),
        ("la06", 926),
        ("la07", 890),
        ("la08", 863),
        ("la09", 951),
        ("la10", 958),
        ("la11", 1222),
        ("la12", 1039),
        ("la13", 1150),
        ("la14", 1292),
        ("la15", 1207),
        ("la16", 945),
        ("la17", 784),
        ("la18", 848),
        ("la19", 842),
        ("la20", 902),
        ("la21", 1046),
        ("la22", 927),
        ("la23", 1032),
        ("la24", 935),
        ("la25", 977),
        ("la26", 1218),
        ("la27", 1235),
        ("la28", 1216),
        ("la29", 1152),
        ("la30", 1355),
        ("la31", 1784),
        ("la32", 1850),
        ("la33", 1719),
        ("la34", 1721),
        ("la35", 1888),
        ("la36", 1268),
        ("la37", 1397),
        ("la38", 1196),
        ("la39", 1233),
        ("la40", 1222),
    ]
    .into_iter()
    .collect()
});

/// Returns the best-known makespan for the named instance, if recorded.
#[must_use]
pub fn best_known(name: &str) -> Option<u64> {
    BEST_KNOWN.get(name).copied()
}

/// Returns whether a best-known makespan is recorded for the named instance.
#[must_use]
pub fn is_known(name: &str) -> bool {
    BEST_KNOWN.contains_key(name)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn looks_up_recorded_instances() {
        assert_eq!(best_known("ft06"), Some(55));
        assert_eq!(best_known("la01"), Some(666));
        assert!(is_known("la40"));
    }

    #[test]
    fn unknown_names_are_absent() {
        assert_eq!(best_known("abz5"), None);
        assert!(!is_known(""));
    }
}

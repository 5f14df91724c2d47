//! Parses the human-readable engagement-count strings Chinese platforms
//! render client-side (`"3.2万"`, `"1.5k"`, `"128"`) into plain integers.

pub fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim().trim_end_matches('+');
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n);
    }

    let (numeric_part, multiplier) = if let Some(stripped) = raw.strip_suffix('万') {
        (stripped, 10_000.0)
    } else if let Some(stripped) = raw.strip_suffix('亿') {
        (stripped, 100_000_000.0)
    } else if let Some(stripped) = raw.strip_suffix('k').or_else(|| raw.strip_suffix('K')) {
        (stripped, 1_000.0)
    } else if let Some(stripped) = raw.strip_suffix('w').or_else(|| raw.strip_suffix('W')) {
        (stripped, 10_000.0)
    } else if let Some(stripped) = raw.strip_suffix('m').or_else(|| raw.strip_suffix('M')) {
        (stripped, 1_000_000.0)
    } else {
        (raw, 1.0)
    };

    let numeric_part = numeric_part.trim().replace(',', "");
    numeric_part
        .parse::<f64>()
        .ok()
        .map(|v| (v * multiplier).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_integer() {
        assert_eq!(parse_count("128"), Some(128));
    }

    #[test]
    fn chinese_wan_suffix() {
        assert_eq!(parse_count("3.2万"), Some(32_000));
    }

    #[test]
    fn chinese_yi_suffix() {
        assert_eq!(parse_count("1.1亿"), Some(110_000_000));
    }

    #[test]
    fn latin_k_suffix() {
        assert_eq!(parse_count("1.5k"), Some(1_500));
    }

    #[test]
    fn comma_separated() {
        assert_eq!(parse_count("12,345"), Some(12_345));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_count("--"), None);
    }

    #[test]
    fn plus_suffix_is_stripped() {
        assert_eq!(parse_count("10000+"), Some(10_000));
        assert_eq!(parse_count("3.2万+"), Some(32_000));
    }
}

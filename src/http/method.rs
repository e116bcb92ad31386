use strum::{Display, EnumString};

#[derive(EnumString, Display, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[strum(ascii_case_insensitive)]
pub enum Method {
    #[strum(serialize = "GET")]
    GET,
    #[strum(serialize = "POST")]
    POST,
    #[strum(serialize = "PUT")]
    PUT,
    #[strum(serialize = "PATCH")]
    PATCH,
    #[strum(serialize = "DELETE")]
    DELETE,
    #[strum(serialize = "HEAD")]
    HEAD,
    #[strum(serialize = "OPTIONS")]
    OPTIONS,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("GET", Method::GET)]
    #[case("post", Method::POST)]
    #[case("Patch", Method::PATCH)]
    fn parses_case_insensitively(#[case] raw: &str, #[case] expected: Method) {
        assert_eq!(Method::from_str(raw).unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_verbs() {
        assert!(Method::from_str("BREW").is_err());
    }
}

use std::fmt;
use strum::Display;

#[derive(Display, Debug, PartialEq, Eq, Clone, Copy)]
pub enum SameSite {
    #[strum(serialize = "None")]
    NoRestriction,
    #[strum(serialize = "Lax")]
    Lax,
    #[strum(serialize = "Strict")]
    Strict,
}

/// A cookie sent back to the client in a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub max_age: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Cookie {
            name: name.into(),
            value: value.into(),
            path: None,
            max_age: None,
            http_only: false,
            secure: false,
            same_site: None,
        }
    }

    /// A cookie that tells the client to drop `name`.
    pub fn expired(name: impl Into<String>) -> Self {
        Cookie::new(name, "").max_age(0)
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(path) = &self.path {
            write!(f, "; Path={}", path)?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={}", max_age)?;
        }
        if let Some(same_site) = self.same_site {
            write!(f, "; SameSite={}", same_site)?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_plain_cookie() {
        assert_eq!(Cookie::new("session", "abc").to_string(), "session=abc");
    }

    #[test]
    fn renders_attributes() {
        let cookie = Cookie::new("id", "7")
            .path("/")
            .max_age(3600)
            .same_site(SameSite::Strict)
            .secure()
            .http_only();

        assert_eq!(
            cookie.to_string(),
            "id=7; Path=/; Max-Age=3600; SameSite=Strict; Secure; HttpOnly"
        );
    }

    #[test]
    fn expired_cookie_has_zero_max_age() {
        assert_eq!(Cookie::expired("id").to_string(), "id=; Max-Age=0");
    }
}

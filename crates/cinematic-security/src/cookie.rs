//! Session cookie formatting and lookup

use cinematic_shared::config::AuthSettings;

#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    pub max_age_seconds: i64,
    pub secure: bool,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, max_age_seconds: i64, secure: bool) -> Self {
        Self {
            name: name.into(),
            max_age_seconds,
            secure,
        }
    }

    pub fn from_settings(settings: &AuthSettings, secure: bool) -> Self {
        Self::new(settings.cookie_name.clone(), settings.max_age_seconds, secure)
    }

    /// `Set-Cookie` value carrying a freshly issued token.
    pub fn set_header(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.name, token, self.max_age_seconds
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that makes the browser drop the session.
    pub fn clear_header(&self) -> String {
        let mut cookie = format!(
            "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax",
            self.name
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Find this cookie's value in a `Cookie` request header. Empty values count as absent.
    pub fn find<'a>(&self, cookie_header: &'a str) -> Option<&'a str> {
        cookie_header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name.trim() == self.name && !value.trim().is_empty()).then(|| value.trim())
        })
    }

    /// Find this cookie's value in a `Set-Cookie` response header.
    pub fn find_in_set_cookie<'a>(&self, set_cookie: &'a str) -> Option<&'a str> {
        let first = set_cookie.split(';').next()?;
        self.find(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(secure: bool) -> SessionCookie {
        SessionCookie::new("cinematic_auth", 604_800, secure)
    }

    #[test]
    fn test_set_header_attributes() {
        let header = cookie(false).set_header("abc=");
        assert_eq!(
            header,
            "cinematic_auth=abc=; Path=/; Max-Age=604800; HttpOnly; SameSite=Lax"
        );
        assert!(cookie(true).set_header("abc").ends_with("; Secure"));
    }

    #[test]
    fn test_clear_header_expires_cookie() {
        let header = cookie(false).clear_header();
        assert!(header.starts_with("cinematic_auth=;"));
        assert!(header.contains("Max-Age=0"));
    }

    #[test]
    fn test_find_in_cookie_header() {
        let c = cookie(false);
        assert_eq!(c.find("theme=dark; cinematic_auth=dG9rZW4=; other=1"), Some("dG9rZW4="));
        assert_eq!(c.find("cinematic_auth=xyz"), Some("xyz"));
        assert_eq!(c.find("theme=dark"), None);
        assert_eq!(c.find("cinematic_auth="), None);
        assert_eq!(c.find("cinematic_auth_old=xyz"), None);
    }

    #[test]
    fn test_find_in_set_cookie() {
        let c = cookie(false);
        let header = c.set_header("dG9rZW4=");
        assert_eq!(c.find_in_set_cookie(&header), Some("dG9rZW4="));
        assert_eq!(c.find_in_set_cookie(&c.clear_header()), None);
    }
}

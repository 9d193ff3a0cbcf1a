/// Status code of a response.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Returns the reason phrase registered for this status code.
    /// For example the status code 404 corresponds to "Not Found".
    ///
    /// Codes without a registered phrase return `None` and are written
    /// without a reason on the status line.
    #[must_use]
    pub fn default_reason_phrase(&self) -> Option<&'static str> {
        let phrase = match self.0 {
            100 => "Continue",
            101 => "Switching Protocols",
            102 => "Processing",
            103 => "Early Hints",

            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            203 => "Non-Authoritative Information",
            204 => "No Content",
            205 => "Reset Content",
            206 => "Partial Content",
            207 => "Multi-Status",
            208 => "Already Reported",
            226 => "IM Used",

            300 => "Multiple Choices",
            301 => "Moved Permanently",
            302 => "Found",
            303 => "See Other",
            304 => "Not Modified",
            305 => "Use Proxy",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",

            400 => "Bad Request",
            401 => "Unauthorized",
            402 => "Payment Required",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            406 => "Not Acceptable",
            407 => "Proxy Authentication Required",
            408 => "Request Timeout",
            409 => "Conflict",
            410 => "Gone",
            411 => "Length Required",
            412 => "Precondition Failed",
            413 => "Content Too Large",
            414 => "URI Too Long",
            415 => "Unsupported Media Type",
            416 => "Range Not Satisfiable",
            417 => "Expectation Failed",
            418 => "I'm a teapot",
            421 => "Misdirected Request",
            422 => "Unprocessable Content",
            423 => "Locked",
            424 => "Failed Dependency",
            425 => "Too Early",
            426 => "Upgrade Required",
            428 => "Precondition Required",
            429 => "Too Many Requests",
            431 => "Request Header Fields Too Large",
            451 => "Unavailable For Legal Reasons",

            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            505 => "HTTP Version Not Supported",
            506 => "Variant Also Negotiates",
            507 => "Insufficient Storage",
            508 => "Loop Detected",
            510 => "Not Extended",
            511 => "Network Authentication Required",
            _ => return None,
        };
        Some(phrase)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! status_code_from {
    ( $($ty:ty),+ ) => {
        $(
            impl From<$ty> for StatusCode {
                fn from(in_code: $ty) -> StatusCode {
                    #[allow(clippy::cast_lossless, clippy::cast_sign_loss, clippy::cast_possible_truncation, trivial_numeric_casts)]
                    StatusCode(in_code as u16)
                }
            }
        )+
    };
}

status_code_from!(u8, u16, i32, u32);

impl PartialEq<u16> for StatusCode {
    fn eq(&self, other: &u16) -> bool {
        &self.0 == other
    }
}

impl PartialEq<StatusCode> for u16 {
    fn eq(&self, other: &StatusCode) -> bool {
        self == &other.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_phrase_test() {
        assert_eq!(StatusCode(200).default_reason_phrase(), Some("OK"));
        assert_eq!(StatusCode(404).default_reason_phrase(), Some("Not Found"));
        assert_eq!(
            StatusCode(500).default_reason_phrase(),
            Some("Internal Server Error")
        );
    }

    #[test]
    fn unknown_phrase_test() {
        assert_eq!(StatusCode(299).default_reason_phrase(), None);
        assert_eq!(StatusCode(799).default_reason_phrase(), None);
    }

    #[test]
    fn from_int_test() {
        assert_eq!(StatusCode::from(201), StatusCode(201));
        assert!(StatusCode(201) == 201_u16);
        assert_eq!(StatusCode::from(204_u16).to_string(), "204");
    }
}

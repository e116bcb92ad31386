#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub code_num: u16,
    pub message: &'static str,
}

impl Status {
    pub const OK: Status = Status {
        code_num: 200,
        message: "OK",
    };
    pub const CREATED: Status = Status {
        code_num: 201,
        message: "Created",
    };
    pub const NO_CONTENT: Status = Status {
        code_num: 204,
        message: "No Content",
    };
    pub const FOUND: Status = Status {
        code_num: 302,
        message: "Found",
    };
    pub const BAD_REQUEST: Status = Status {
        code_num: 400,
        message: "Bad Request",
    };
    pub const UNAUTHORIZED: Status = Status {
        code_num: 401,
        message: "Unauthorized",
    };
    pub const FORBIDDEN: Status = Status {
        code_num: 403,
        message: "Forbidden",
    };
    pub const NOT_FOUND: Status = Status {
        code_num: 404,
        message: "Not Found",
    };
    pub const INTERNAL_SERVER_ERROR: Status = Status {
        code_num: 500,
        message: "Internal Server Error",
    };

    const KNOWN: [Status; 9] = [
        Self::OK,
        Self::CREATED,
        Self::NO_CONTENT,
        Self::FOUND,
        Self::BAD_REQUEST,
        Self::UNAUTHORIZED,
        Self::FORBIDDEN,
        Self::NOT_FOUND,
        Self::INTERNAL_SERVER_ERROR,
    ];

    /// Known status for `code`, or one with an empty reason phrase.
    pub fn from_code(code: u16) -> Status {
        Self::KNOWN
            .into_iter()
            .find(|s| s.code_num == code)
            .unwrap_or(Status {
                code_num: code,
                message: "",
            })
    }
}

//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointer plus length instead of
//! `Vec`, and plain integers for the status filter. Conversion functions live
//! here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use explorer_core::error::NetworkError;
use explorer_core::types::{Character, CharacterPage, Status};

/// No status filter / status not applicable.
pub const RM_STATUS_NONE: i32 = -1;
pub const RM_STATUS_ALIVE: i32 = 0;
pub const RM_STATUS_DEAD: i32 = 1;
pub const RM_STATUS_UNKNOWN: i32 = 2;

/// Decode a C status code. `None` means the code is not recognised,
/// `Some(None)` means "no filter".
pub(crate) fn status_from_code(code: i32) -> Option<Option<Status>> {
    match code {
        RM_STATUS_NONE => Some(None),
        RM_STATUS_ALIVE => Some(Some(Status::Alive)),
        RM_STATUS_DEAD => Some(Some(Status::Dead)),
        RM_STATUS_UNKNOWN => Some(Some(Status::Unknown)),
        _ => None,
    }
}

pub(crate) fn status_code(status: Option<Status>) -> i32 {
    match status {
        None => RM_STATUS_NONE,
        Some(Status::Alive) => RM_STATUS_ALIVE,
        Some(Status::Dead) => RM_STATUS_DEAD,
        Some(Status::Unknown) => RM_STATUS_UNKNOWN,
    }
}

/// Copy `s` into a C string owned by the caller. Interior NULs cannot be
/// represented and yield an empty string.
pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Leak a `Vec` as a pointer/length pair. Empty vectors become null.
pub(crate) fn leak_vec<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len() as u32;
    let boxed = items.into_boxed_slice();
    (Box::into_raw(boxed) as *mut T, len)
}

/// Opaque handle to a `CharacterClient`.
pub struct FfiCharacterClient {
    pub(crate) inner: explorer_core::CharacterClient,
}

/// Opaque handle to a `CharacterListState`.
pub struct FfiListState {
    pub(crate) inner: explorer_core::CharacterListState,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A GET request described as C-compatible plain data.
///
/// Built by `rm_build_*` functions. The C caller executes the request and
/// passes the response back through `rm_parse_*` or
/// `rm_list_state_apply_page`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: explorer_core::HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = leak_vec(headers);
        Box::into_raw(Box::new(FfiHttpRequest {
            url: c_string(req.url),
            headers,
            headers_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The caller builds this after executing a request and passes a pointer to
/// it. A null `body` means the transport delivered no body at all. The FFI
/// layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const u8,
    pub body_len: usize,
}

impl FfiHttpResponse {
    /// # Safety
    /// `body` must be null or point to `body_len` readable bytes.
    pub(crate) unsafe fn to_core(&self) -> explorer_core::HttpResponse {
        if self.body.is_null() {
            return explorer_core::HttpResponse::empty(self.status);
        }
        let body = unsafe { std::slice::from_raw_parts(self.body, self.body_len) };
        explorer_core::HttpResponse::new(self.status, body.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiPageResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidUrl = 1,
    Decoding = 2,
    NoData = 3,
    BadStatusCode = 4,
    Unknown = 5,
    Panic = 6,
    NullArg = 7,
}

/// One character exposed to C. Nested locations are flattened to their
/// names; `episodes` holds the raw episode URLs.
#[repr(C)]
pub struct FfiCharacter {
    pub id: i64,
    pub name: *mut c_char,
    pub status: i32,
    pub species: *mut c_char,
    pub kind: *mut c_char,
    pub gender: *mut c_char,
    pub origin: *mut c_char,
    pub location: *mut c_char,
    pub image: *mut c_char,
    pub episodes: *mut *mut c_char,
    pub episodes_len: u32,
}

impl From<&Character> for FfiCharacter {
    fn from(c: &Character) -> Self {
        let episodes: Vec<*mut c_char> = c.episode.iter().map(|e| c_string(e.as_str())).collect();
        let (episodes, episodes_len) = leak_vec(episodes);
        FfiCharacter {
            id: c.id,
            name: c_string(c.name.as_str()),
            status: status_code(Some(c.status)),
            species: c_string(c.species.as_str()),
            kind: c_string(c.kind.as_str()),
            gender: c_string(c.gender.as_str()),
            origin: c_string(c.origin.name.as_str()),
            location: c_string(c.location.name.as_str()),
            image: c_string(c.image.as_str()),
            episodes,
            episodes_len,
        }
    }
}

/// A list of characters exposed to C.
#[repr(C)]
pub struct FfiCharacterList {
    pub items: *mut FfiCharacter,
    pub len: u32,
}

impl FfiCharacterList {
    pub(crate) fn from_characters<'a>(characters: impl IntoIterator<Item = &'a Character>) -> *mut Self {
        let items: Vec<FfiCharacter> = characters.into_iter().map(FfiCharacter::from).collect();
        let (items, len) = leak_vec(items);
        Box::into_raw(Box::new(FfiCharacterList { items, len }))
    }
}

/// Result envelope for page parsing.
///
/// On success `error_code` is `Ok`, `error_message` is null, `has_next`
/// reflects `info.next` and `data` holds the page's characters.
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, `http_status` is set for `BadStatusCode` and
/// `data` is null.
#[repr(C)]
pub struct FfiPageResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub has_next: bool,
    pub data: *mut FfiCharacterList,
}

impl FfiPageResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        has_next: bool,
        data: *mut FfiCharacterList,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiPageResult {
            error_code,
            error_message,
            http_status,
            has_next,
            data,
        }))
    }

    pub(crate) fn ok(page: &CharacterPage) -> *mut Self {
        let data = FfiCharacterList::from_characters(&page.results);
        Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), 0, page.has_next(), data)
    }

    /// The message is the error's user-facing description.
    pub(crate) fn from_error(err: NetworkError) -> *mut Self {
        let (code, http_status) = match &err {
            NetworkError::InvalidUrl => (FfiErrorCode::InvalidUrl, 0),
            NetworkError::DecodingError(_) => (FfiErrorCode::Decoding, 0),
            NetworkError::NoData => (FfiErrorCode::NoData, 0),
            NetworkError::BadStatusCode(status) => (FfiErrorCode::BadStatusCode, *status),
            NetworkError::Unknown => (FfiErrorCode::Unknown, 0),
        };
        Self::boxed(code, c_string(err.description()), http_status, false, std::ptr::null_mut())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        let msg = format!("null argument: {name}");
        Self::boxed(FfiErrorCode::NullArg, c_string(msg), 0, false, std::ptr::null_mut())
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, c_string(msg), 0, false, std::ptr::null_mut())
    }
}

//! C-ABI wrapper around `explorer-core`.
//!
//! # Overview
//! Exposes the character request builder, the page parser and the list
//! state through `extern "C"` functions so a native host (Swift, Kotlin/JNI,
//! C) can page, search and filter characters while doing its own networking.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `rm_build_*` / `rm_parse_*` mirror the core client 1:1.
//! - The list state is an opaque handle. A typical page load is
//!   `rm_list_state_build_request`, host IO, then `rm_list_state_apply_page`.
//! - A single `FfiPageResult` envelope conveys pages and errors uniformly.
//! - The caller owns every returned pointer and must release it with the
//!   matching `rm_free_*` / `*_free` function.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use explorer_core::{CharacterClient, CharacterListState};

use types::*;

/// Read a nullable C string. Invalid UTF-8 reads as empty.
///
/// # Safety
/// `s` must be null or a valid NUL-terminated string.
unsafe fn opt_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(s) }.to_str().unwrap_or(""))
    }
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `CharacterClient` bound to `base_url`. A null `base_url`
/// selects the public API.
///
/// Returns null only if an internal panic occurs.
/// The caller must free the returned pointer with `rm_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn rm_client_new(base_url: *const c_char) -> *mut FfiCharacterClient {
    catch_unwind(|| {
        let url = unsafe { opt_str(base_url) }.unwrap_or(explorer_core::DEFAULT_BASE_URL);
        let client = CharacterClient::new(url);
        Box::into_raw(Box::new(FfiCharacterClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `rm_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rm_client_free(client: *mut FfiCharacterClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build / parse
// ---------------------------------------------------------------------------

/// Build `GET /character` for `page`.
///
/// `name` may be null (no search). `status` is one of the `RM_STATUS_*`
/// codes. Returns null if `client` is null, `status` is not a known code or
/// the base URL does not form a valid URL.
/// The caller must free the returned pointer with `rm_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn rm_build_fetch_characters(
    client: *const FfiCharacterClient,
    page: u32,
    name: *const c_char,
    status: i32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let Some(status) = status_from_code(status) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        let name = unsafe { opt_str(name) };
        match client.inner.build_fetch_characters(page, name, status) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse the response to a `rm_build_fetch_characters` request.
///
/// The caller must free the returned pointer with `rm_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn rm_parse_fetch_characters(
    client: *const FfiCharacterClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPageResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPageResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPageResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let core_resp = unsafe { (*response).to_core() };
        match client.inner.parse_fetch_characters(core_resp) {
            Ok(page) => FfiPageResult::ok(&page),
            Err(e) => FfiPageResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPageResult::panic("panic in rm_parse_fetch_characters"))
}

// ---------------------------------------------------------------------------
// List state
// ---------------------------------------------------------------------------

/// Create an empty list state positioned on page 1.
/// The caller must free the returned pointer with `rm_list_state_free`.
#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_new() -> *mut FfiListState {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiListState {
            inner: CharacterListState::new(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a list state. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_free(state: *mut FfiListState) {
    if !state.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(state) });
        });
    }
}

/// Build the request for the next page under the current search and filter,
/// and mark the state as loading.
///
/// Returns null if an argument is null or there are no more pages.
#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_build_request(
    state: *mut FfiListState,
    client: *const FfiCharacterClient,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if state.is_null() || client.is_null() {
            return std::ptr::null_mut();
        }
        let state = unsafe { &mut (*state).inner };
        let client = unsafe { &*client };
        if !state.has_more {
            return std::ptr::null_mut();
        }
        match client.inner.build_fetch_characters(
            state.current_page,
            state.request_name(),
            state.status_filter,
        ) {
            Ok(req) => {
                state.is_loading = true;
                FfiHttpRequest::from_core(req)
            }
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse a page response and, on success, append it to the state.
///
/// Loading is cleared either way. On failure pagination is untouched so the
/// same page can be requested again.
#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_apply_page(
    state: *mut FfiListState,
    client: *const FfiCharacterClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPageResult {
    catch_unwind(|| {
        if state.is_null() {
            return FfiPageResult::null_arg("state");
        }
        if client.is_null() {
            return FfiPageResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPageResult::null_arg("response");
        }
        let state = unsafe { &mut (*state).inner };
        let client = unsafe { &*client };
        let core_resp = unsafe { (*response).to_core() };
        state.is_loading = false;
        match client.inner.parse_fetch_characters(core_resp) {
            Ok(page) => {
                let result = FfiPageResult::ok(&page);
                state.apply_page(page);
                result
            }
            Err(e) => FfiPageResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPageResult::panic("panic in rm_list_state_apply_page"))
}

/// Set the search query; a null `query` counts as empty. Returns true when
/// pagination was reset and the list must be fetched again.
#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_update_search_query(
    state: *mut FfiListState,
    query: *const c_char,
) -> bool {
    catch_unwind(|| {
        if state.is_null() {
            return false;
        }
        let state = unsafe { &mut (*state).inner };
        let query = unsafe { opt_str(query) }.unwrap_or("");
        let changed = query != state.search_query;
        state.update_search_query(query);
        changed
    })
    .unwrap_or(false)
}

/// Set the status filter to one of the `RM_STATUS_*` codes. Unknown codes
/// are ignored. Returns true when the filter changed and pagination was reset.
#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_update_status_filter(state: *mut FfiListState, status: i32) -> bool {
    catch_unwind(|| {
        if state.is_null() {
            return false;
        }
        let Some(status) = status_from_code(status) else {
            return false;
        };
        let state = unsafe { &mut (*state).inner };
        let changed = status != state.status_filter;
        state.update_status_filter(status);
        changed
    })
    .unwrap_or(false)
}

/// Clear the search query. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_reset_search(state: *mut FfiListState) {
    if !state.is_null() {
        let _ = catch_unwind(|| unsafe { &mut (*state).inner }.reset_search());
    }
}

/// Clear the status filter. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_reset_filters(state: *mut FfiListState) {
    if !state.is_null() {
        let _ = catch_unwind(|| unsafe { &mut (*state).inner }.reset_filters());
    }
}

// ---------------------------------------------------------------------------
// List state accessors
// ---------------------------------------------------------------------------

/// Next page to request. 0 if `state` is null.
#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_current_page(state: *const FfiListState) -> u32 {
    if state.is_null() {
        return 0;
    }
    unsafe { &*state }.inner.current_page
}

#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_has_more(state: *const FfiListState) -> bool {
    !state.is_null() && unsafe { &*state }.inner.has_more
}

#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_is_loading(state: *const FfiListState) -> bool {
    !state.is_null() && unsafe { &*state }.inner.is_loading
}

#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_len(state: *const FfiListState) -> u32 {
    if state.is_null() {
        return 0;
    }
    unsafe { &*state }.inner.characters.len() as u32
}

/// Current status filter as an `RM_STATUS_*` code.
#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_status_filter(state: *const FfiListState) -> i32 {
    if state.is_null() {
        return RM_STATUS_NONE;
    }
    status_code(unsafe { &*state }.inner.status_filter)
}

/// Copy of the current search query. Free with `rm_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_search_query(state: *const FfiListState) -> *mut c_char {
    catch_unwind(|| {
        if state.is_null() {
            return std::ptr::null_mut();
        }
        c_string(unsafe { &*state }.inner.search_query.as_str())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Copy of every loaded character. Free with `rm_free_character_list`.
#[unsafe(no_mangle)]
pub extern "C" fn rm_list_state_characters(state: *const FfiListState) -> *mut FfiCharacterList {
    catch_unwind(|| {
        if state.is_null() {
            return std::ptr::null_mut();
        }
        FfiCharacterList::from_characters(&unsafe { &*state }.inner.characters)
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Reclaim a slice leaked by `leak_vec`.
///
/// # Safety
/// `ptr`/`len` must come from `leak_vec` and not have been reclaimed yet.
unsafe fn reclaim_vec<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

/// # Safety
/// `s` must be null or come from `CString::into_raw`.
unsafe fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free the fields of an `FfiCharacter` (but not the struct itself).
fn free_ffi_character_fields(c: &FfiCharacter) {
    unsafe {
        for s in [c.name, c.species, c.kind, c.gender, c.origin, c.location, c.image] {
            free_c_string(s);
        }
        for episode in reclaim_vec(c.episodes, c.episodes_len) {
            free_c_string(episode);
        }
    }
}

/// Free an `FfiHttpRequest` returned by any `rm_*build*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rm_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            free_c_string(req.url);
            for h in reclaim_vec(req.headers, req.headers_len) {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free a character list. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rm_free_character_list(list: *mut FfiCharacterList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let list = unsafe { Box::from_raw(list) };
        for item in unsafe { reclaim_vec(list.items, list.len) } {
            free_ffi_character_fields(&item);
        }
    });
}

/// Free an `FfiPageResult`, including its character list. Safe to call with
/// null.
#[unsafe(no_mangle)]
pub extern "C" fn rm_free_result(result: *mut FfiPageResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        unsafe { free_c_string(result.error_message) };
        rm_free_character_list(result.data);
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rm_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { free_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

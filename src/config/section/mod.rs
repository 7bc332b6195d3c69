//! Configuration section definitions.
//!
//! Each module corresponds to a section in `rewrite.toml`:
//!
//! | Module     | TOML Section   | Purpose                           |
//! |------------|----------------|-----------------------------------|
//! | `rewrite`  | `[rewrite]`    | Slot write-back behavior          |

mod rewrite;

pub use rewrite::RewriteOptions;

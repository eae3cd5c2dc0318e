// src/specs/mod.rs
//! # Site "specs" module
//!
//! One file per remote site. Each spec encodes *where the data lives* in that
//! site's pages or payloads and *how to pull it out* without trusting the
//! markup to stay still.
//!
//! ## What lives here
//! - **Request shapes**: endpoint paths, form fields, query parameters.
//! - **Pure parsing** of the responses (`parse_*` functions) using the
//!   `core::html` block scanner, `core::sanitize` and `core::embedded`.
//! - **Typed payloads** the sites accept (`custom_food::CustomFood`).
//!
//! ## What does **not** live here
//! - **Normalization** of amounts and nutrients: that is `nutrition`.
//! - **Mutation planning** (entry numbers, amount specifiers): that is `diary`.
//! - **Multi-page assembly and file output**: `report` and `runner`.
//!
//! ## Conventions
//! - Fetchers take `&dyn Transport` and do exactly one request per page.
//! - A missing structural element is `MalformedResponse`, never a silent default.
//! - Parsers are testable offline against inline fixtures.
//!
//! ## Specs
//! - `mynetdiary` – the diary: log-on, day grid, saves, search, custom foods,
//!   nutrition report and weight.
//! - `fitnesspal` – MyFitnessPal search and nutrition facts.
//! - `tesco` – Tesco product pages.
//! - `external` – source/url resolution over the two above.

pub mod custom_food;
pub mod external;
pub mod fitnesspal;
pub mod mynetdiary;
pub mod tesco;

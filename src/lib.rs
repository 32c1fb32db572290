//! This crate implements the symbol tables of a proguard mapping file.
//!
//! A dex optimizer works on obfuscated bytecode but is often configured in
//! terms of original names. A [`ProguardMap`] translates class, field and
//! method descriptors from their original to their obfuscated names, and
//! hands out the line ranges recorded for obfuscated methods.
//!
//! The mapping can also be parsed line-by-line with [`ProguardMapping`].
//!
//! # Examples
//!
//! ```
//! let mapping = r#"# compiler: R8
//! com.foo.bar -> A:
//!     int do1 -> a
//!     8:929:java.util.ArrayList getCopy() -> a
//! "#;
//! let map = proguard_map::ProguardMap::try_from(mapping).unwrap();
//!
//! // translating a class
//! assert_eq!(map.translate_class("Lcom/foo/bar;"), "LA;");
//!
//! // translating members
//! assert_eq!(map.translate_field("Lcom/foo/bar;.do1:I"), "LA;.a:I");
//! assert_eq!(
//!     map.translate_method("Lcom/foo/bar;.getCopy:()Ljava/util/ArrayList;"),
//!     "LA;.a:()Ljava/util/ArrayList;",
//! );
//!
//! // line ranges of an obfuscated method
//! assert_eq!(
//!     map.method_lines("LA;.a:()Ljava/util/ArrayList;"),
//!     &[proguard_map::ProguardLineRange::new(8, 929, 0, 0)],
//! );
//! ```

#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod java;
mod line_range;
mod map;
mod mapping;

pub use config::MapConfig;
pub use error::Error;
pub use java::{class_name_to_descriptor, java_type_to_descriptor, FieldDescriptor, MethodDescriptor};
pub use line_range::ProguardLineRange;
pub use map::ProguardMap;
pub use mapping::{
    MappingSummary, ParseError, ParseErrorKind, ProguardMapping, ProguardRecord, ProguardRecordIter,
};

#[cfg(feature = "uuid")]
use uuid::Uuid;

/// Calculates the UUID of the mapping file.
#[cfg(feature = "uuid")]
pub fn mapping_uuid(mapping: &[u8]) -> Uuid {
    lazy_static::lazy_static! {
        static ref NAMESPACE: Uuid = Uuid::new_v5(&Uuid::NAMESPACE_DNS, b"guardsquare.com");
    }
    // this internally only operates on bytes, so this is safe to do
    Uuid::new_v5(&NAMESPACE, mapping)
}

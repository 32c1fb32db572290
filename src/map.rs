use std::borrow::Cow;
use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::builder::{FieldKey, MethodKey, SymbolTableBuilder, SymbolTables};
use crate::config::MapConfig;
use crate::error::Error;
use crate::java::{remap_parameters, remap_type, FieldDescriptor, MethodDescriptor};
use crate::line_range::ProguardLineRange;
use crate::mapping::ProguardMapping;

/// Translates class, field and method descriptors between their original
/// and obfuscated names.
///
/// A `ProguardMap` is built once from a complete mapping and never changes
/// afterwards, so it can be shared by reference between threads.
///
/// Translations never fail. Whatever has no mapping is left as it is, so an
/// unknown field of a known class still gets its class and type translated.
#[derive(Clone, Debug, Default)]
pub struct ProguardMap {
    tables: SymbolTables,
}

impl<'s> TryFrom<&'s str> for ProguardMap {
    type Error = Error;

    fn try_from(s: &'s str) -> Result<Self, Self::Error> {
        Self::new(ProguardMapping::new(s.as_bytes()))
    }
}

impl ProguardMap {
    /// Creates a map without any classes, translating everything to itself.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a map from a mapping, failing on the first malformed line.
    pub fn new(mapping: ProguardMapping<'_>) -> Result<Self, Error> {
        Self::build(mapping, false)
    }

    /// Reads the whole `reader` and builds a map from it.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, Error> {
        let mut source = Vec::new();
        reader.read_to_end(&mut source)?;
        Self::new(ProguardMapping::new(&source))
    }

    /// Reads a mapping file and builds a map from it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::read(path.as_ref(), false)
    }

    /// Builds the map a [`MapConfig`] points to.
    ///
    /// Without a configured mapping this is an [empty](Self::empty) map.
    pub fn from_config(config: &MapConfig) -> Result<Self, Error> {
        match config.proguard_map {
            Some(ref path) => Self::read(path, config.skip_malformed_lines),
            None => {
                debug!("no proguard map configured");
                Ok(Self::empty())
            }
        }
    }

    fn read(path: &Path, skip_malformed_lines: bool) -> Result<Self, Error> {
        let source = fs::read(path).map_err(|source| Error::Read {
            path: path.to_owned(),
            source,
        })?;
        debug!(path = %path.display(), bytes = source.len(), "reading proguard map");
        Self::build(ProguardMapping::new(&source), skip_malformed_lines)
    }

    fn build(mapping: ProguardMapping<'_>, skip_malformed_lines: bool) -> Result<Self, Error> {
        let tables = SymbolTableBuilder::new(skip_malformed_lines).build(mapping)?;
        Ok(Self { tables })
    }

    /// Whether the map has no classes at all.
    pub fn is_empty(&self) -> bool {
        self.tables.classes.is_empty()
    }

    /// The number of mapped classes.
    pub fn class_count(&self) -> usize {
        self.tables.classes.len()
    }

    /// The number of mapped fields.
    pub fn field_count(&self) -> usize {
        self.tables.fields.len()
    }

    /// The number of mapped methods.
    pub fn method_count(&self) -> usize {
        self.tables.methods.len()
    }

    fn translate_type<'a>(&self, ty: &'a str) -> Cow<'a, str> {
        remap_type(ty, &self.tables.classes)
    }

    fn deobfuscate_type<'a>(&self, ty: &'a str) -> Cow<'a, str> {
        remap_type(ty, &self.tables.original_classes)
    }

    /// Translates an original class descriptor to its obfuscated one.
    ///
    /// Array descriptors translate their element class.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = proguard_map::ProguardMap::try_from("com.foo.bar -> A:").unwrap();
    ///
    /// assert_eq!(map.translate_class("Lcom/foo/bar;"), "LA;");
    /// assert_eq!(map.translate_class("[Lcom/foo/bar;"), "[LA;");
    /// assert_eq!(map.translate_class("Lcom/not/Found;"), "Lcom/not/Found;");
    /// ```
    pub fn translate_class(&self, class: &str) -> String {
        self.translate_type(class).into_owned()
    }

    /// Translates an original field descriptor to its obfuscated one.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = proguard_map::ProguardMap::try_from("com.foo.bar -> A:\n    int do1 -> a\n").unwrap();
    ///
    /// assert_eq!(map.translate_field("Lcom/foo/bar;.do1:I"), "LA;.a:I");
    /// assert_eq!(map.translate_field("Lcom/foo/bar;.other:I"), "LA;.other:I");
    /// ```
    pub fn translate_field(&self, field: &str) -> String {
        let Some(descriptor) = FieldDescriptor::parse(field) else {
            return field.to_owned();
        };

        let key = FieldKey::new(descriptor.class, descriptor.name, descriptor.ty);
        let name = self
            .tables
            .fields
            .get(&key)
            .map_or(descriptor.name, String::as_str);

        FieldDescriptor {
            class: &self.translate_type(descriptor.class),
            name,
            ty: &self.translate_type(descriptor.ty),
        }
        .to_string()
    }

    /// Translates an original method descriptor to its obfuscated one.
    ///
    /// The lookup uses the complete original signature, so overloads that
    /// share one obfuscated name are told apart. Methods inlined from another
    /// class are addressed by their dotted name.
    ///
    /// # Examples
    ///
    /// ```
    /// let mapping = r#"some.Class -> A:
    ///     java.util.List select(java.util.List) -> a
    ///     3:3:void sync():425:425 -> a
    /// "#;
    /// let map = proguard_map::ProguardMap::try_from(mapping).unwrap();
    ///
    /// assert_eq!(map.translate_method("Lsome/Class;.sync:()V"), "LA;.a:()V");
    /// assert_eq!(
    ///     map.translate_method("Lsome/Class;.select:(Ljava/util/List;)Ljava/util/List;"),
    ///     "LA;.a:(Ljava/util/List;)Ljava/util/List;",
    /// );
    /// ```
    pub fn translate_method(&self, method: &str) -> String {
        let Some(descriptor) = MethodDescriptor::parse(method) else {
            return method.to_owned();
        };

        let key = MethodKey::new(
            descriptor.class,
            descriptor.name,
            descriptor.parameters,
            descriptor.return_type,
        );
        let name = self
            .tables
            .methods
            .get(&key)
            .map_or(descriptor.name, String::as_str);

        MethodDescriptor {
            class: &self.translate_type(descriptor.class),
            name,
            parameters: &remap_parameters(descriptor.parameters, &self.tables.classes),
            return_type: &self.translate_type(descriptor.return_type),
        }
        .to_string()
    }

    /// Returns every line range declared for an obfuscated method.
    ///
    /// The ranges are in no particular order. Picking the one that matches a
    /// given obfuscated line is up to the caller, see
    /// [`ProguardLineRange::contains`].
    ///
    /// # Examples
    ///
    /// ```
    /// use proguard_map::{ProguardLineRange, ProguardMap};
    ///
    /// let mapping = r#"com.foo.bar -> A:
    ///     1:2:void onRun():282:283 -> o
    ///     3:3:void onRun():385:385 -> o
    /// "#;
    /// let map = ProguardMap::try_from(mapping).unwrap();
    ///
    /// let lines = map.method_lines("LA;.o:()V");
    /// assert_eq!(lines.len(), 2);
    /// assert!(lines.contains(&ProguardLineRange::new(3, 3, 385, 385)));
    /// assert!(map.method_lines("LA;.unknown:()V").is_empty());
    /// ```
    pub fn method_lines(&self, method: &str) -> &[ProguardLineRange] {
        let Some(descriptor) = MethodDescriptor::parse(method) else {
            return &[];
        };

        let key = MethodKey::new(
            descriptor.class,
            descriptor.name,
            descriptor.parameters,
            descriptor.return_type,
        );
        self.tables
            .method_lines
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a class is referenced as a type but never declared itself.
    ///
    /// # Examples
    ///
    /// ```
    /// let mapping = r#"com.foo.bar -> A:
    ///     com.foo.Listener listener -> a
    /// "#;
    /// let map = proguard_map::ProguardMap::try_from(mapping).unwrap();
    ///
    /// assert!(map.is_special_interface("Lcom/foo/Listener;"));
    /// assert!(!map.is_special_interface("Lcom/foo/bar;"));
    /// ```
    pub fn is_special_interface(&self, class: &str) -> bool {
        self.tables
            .special_interfaces
            .contains(class.trim_start_matches('['))
    }

    /// Translates an obfuscated class descriptor back to its original one.
    pub fn deobfuscate_class(&self, class: &str) -> String {
        self.deobfuscate_type(class).into_owned()
    }

    /// Translates an obfuscated field descriptor back to its original one.
    pub fn deobfuscate_field(&self, field: &str) -> String {
        let Some(descriptor) = FieldDescriptor::parse(field) else {
            return field.to_owned();
        };

        let key = FieldKey::new(descriptor.class, descriptor.name, descriptor.ty);
        match self.tables.original_fields.get(&key) {
            Some(original) => original.to_string(),
            None => FieldDescriptor {
                class: &self.deobfuscate_type(descriptor.class),
                name: descriptor.name,
                ty: &self.deobfuscate_type(descriptor.ty),
            }
            .to_string(),
        }
    }

    /// Translates an obfuscated method descriptor back to its original one.
    ///
    /// When inlined methods share the obfuscated signature, the one declared
    /// last in the mapping wins.
    ///
    /// # Examples
    ///
    /// ```
    /// let mapping = r#"com.foo.bar -> A:
    ///     1:1:boolean isExpired():490:490 -> k
    ///     1:1:boolean isRequirementsMet():275 -> k
    /// "#;
    /// let map = proguard_map::ProguardMap::try_from(mapping).unwrap();
    ///
    /// assert_eq!(
    ///     map.deobfuscate_method("LA;.k:()Z"),
    ///     "Lcom/foo/bar;.isRequirementsMet:()Z"
    /// );
    /// ```
    pub fn deobfuscate_method(&self, method: &str) -> String {
        let Some(descriptor) = MethodDescriptor::parse(method) else {
            return method.to_owned();
        };

        let key = MethodKey::new(
            descriptor.class,
            descriptor.name,
            descriptor.parameters,
            descriptor.return_type,
        );
        match self.tables.original_methods.get(&key) {
            Some(original) => original.to_string(),
            None => MethodDescriptor {
                class: &self.deobfuscate_type(descriptor.class),
                name: descriptor.name,
                parameters: &remap_parameters(
                    descriptor.parameters,
                    &self.tables.original_classes,
                ),
                return_type: &self.deobfuscate_type(descriptor.return_type),
            }
            .to_string(),
        }
    }
}

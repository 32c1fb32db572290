//! Builds the lookup tables of a [`ProguardMap`](crate::ProguardMap) from the
//! records of a [`ProguardMapping`].
//!
//! All keys are descriptors. Forward maps are keyed by original names, the
//! line ranges and reverse maps by obfuscated names. Anything keyed by
//! obfuscated types is only assembled in [`SymbolTableBuilder::finish`], once
//! every class of the file is known.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::java::{
    argument_descriptors, class_element, class_name_to_descriptor, java_type_to_descriptor,
    remap_parameters, remap_type,
};
use crate::line_range::ProguardLineRange;
use crate::mapping::{ProguardMapping, ProguardRecord};

/// A key that uniquely identifies a field.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub(crate) struct FieldKey {
    /// The owning class.
    pub(crate) class: String,
    /// The field's name.
    pub(crate) name: String,
    /// The field's type.
    pub(crate) ty: String,
}

impl FieldKey {
    pub(crate) fn new(class: &str, name: &str, ty: &str) -> Self {
        Self {
            class: class.to_owned(),
            name: name.to_owned(),
            ty: ty.to_owned(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.class, self.name, self.ty)
    }
}

/// A key that uniquely identifies a method, even among overloads that share
/// an obfuscated name.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub(crate) struct MethodKey {
    /// The owning class.
    pub(crate) class: String,
    /// The method's name.
    pub(crate) name: String,
    /// The concatenated parameter types.
    pub(crate) parameters: String,
    /// The return type.
    pub(crate) return_type: String,
}

impl MethodKey {
    pub(crate) fn new(class: &str, name: &str, parameters: &str, return_type: &str) -> Self {
        Self {
            class: class.to_owned(),
            name: name.to_owned(),
            parameters: parameters.to_owned(),
            return_type: return_type.to_owned(),
        }
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}:({}){}",
            self.class, self.name, self.parameters, self.return_type
        )
    }
}

/// The finished lookup tables.
#[derive(Clone, Debug, Default)]
pub(crate) struct SymbolTables {
    /// Original to obfuscated class descriptors.
    pub(crate) classes: HashMap<String, String>,
    /// Obfuscated to original class descriptors.
    pub(crate) original_classes: HashMap<String, String>,
    /// Original fields to obfuscated field names.
    pub(crate) fields: HashMap<FieldKey, String>,
    /// Obfuscated fields to original fields.
    pub(crate) original_fields: HashMap<FieldKey, FieldKey>,
    /// Original methods to obfuscated method names.
    pub(crate) methods: HashMap<MethodKey, String>,
    /// Obfuscated methods to original methods.
    pub(crate) original_methods: HashMap<MethodKey, MethodKey>,
    /// Line ranges of every obfuscated method.
    pub(crate) method_lines: HashMap<MethodKey, Vec<ProguardLineRange>>,
    /// Classes referenced as types but never declared.
    pub(crate) special_interfaces: HashSet<String>,
}

/// The class header most recently seen.
struct CurrentClass {
    original: String,
    obfuscated: String,
}

/// A line range together with the original method it was declared for.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct DeclaredLines<'s> {
    original: &'s str,
    line_range: ProguardLineRange,
}

/// The line ranges of one obfuscated method, before the key is translated.
#[derive(Default)]
struct LineBucket<'s> {
    seen: HashSet<DeclaredLines<'s>>,
    ranges: Vec<ProguardLineRange>,
}

/// Accumulates the records of a mapping in file order.
#[derive(Default)]
pub(crate) struct SymbolTableBuilder<'s> {
    skip_malformed_lines: bool,
    classes: HashMap<String, String>,
    fields: HashMap<FieldKey, String>,
    methods: HashMap<MethodKey, String>,
    /// Fields and methods in declaration order, so the reverse maps resolve
    /// shared obfuscated signatures to the last declaration.
    declared_fields: Vec<(FieldKey, &'s str)>,
    declared_methods: Vec<(MethodKey, &'s str)>,
    /// Keyed by obfuscated class and name but original types.
    lines: HashMap<MethodKey, LineBucket<'s>>,
    referenced_types: HashSet<String>,
}

impl<'s> SymbolTableBuilder<'s> {
    pub(crate) fn new(skip_malformed_lines: bool) -> Self {
        Self {
            skip_malformed_lines,
            ..Self::default()
        }
    }

    /// Consumes every record of `mapping` and assembles the tables.
    ///
    /// Fails on the first malformed line unless malformed lines are skipped.
    pub(crate) fn build(mut self, mapping: ProguardMapping<'s>) -> Result<SymbolTables, Error> {
        let mut current_class: Option<CurrentClass> = None;
        let mut records = mapping.iter();

        while let Some(record) = records.next() {
            let record = match record {
                Ok(record) => record,
                Err(err) if self.skip_malformed_lines => {
                    warn!(
                        line_number = err.line_number(),
                        line = %String::from_utf8_lossy(err.line()),
                        "skipping malformed mapping line: {}",
                        err.kind()
                    );
                    // an unindented line was meant as a class header, so the
                    // members that follow do not belong to the previous class
                    if !err.line().starts_with(b" ") && !err.line().starts_with(b"\t") {
                        current_class = None;
                    }
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            match record {
                ProguardRecord::Header { .. } => {}
                ProguardRecord::Class {
                    original,
                    obfuscated,
                } => {
                    current_class = Some(self.add_class(original, obfuscated));
                }
                ProguardRecord::Field { .. } | ProguardRecord::Method { .. } => {
                    let Some(class) = current_class.as_ref() else {
                        let line_number = records.line_number();
                        if self.skip_malformed_lines {
                            warn!(line_number, "skipping member outside of any class");
                            continue;
                        }
                        return Err(Error::MemberOutsideClass { line_number });
                    };
                    self.add_member(class, record);
                }
            }
        }

        Ok(self.finish())
    }

    fn add_class(&mut self, original: &str, obfuscated: &str) -> CurrentClass {
        let original = class_name_to_descriptor(original);
        let obfuscated = class_name_to_descriptor(obfuscated);

        if let Some(previous) = self.classes.insert(original.clone(), obfuscated.clone()) {
            trace!(%original, %previous, %obfuscated, "class redeclared");
        }

        CurrentClass {
            original,
            obfuscated,
        }
    }

    fn add_member(&mut self, class: &CurrentClass, record: ProguardRecord<'s>) {
        match record {
            ProguardRecord::Field {
                ty,
                original,
                obfuscated,
            } => {
                let ty = java_type_to_descriptor(ty);
                self.reference_type(&ty);

                let key = FieldKey {
                    class: class.original.clone(),
                    name: original.to_owned(),
                    ty,
                };
                if let Some(previous) = self.fields.insert(key.clone(), obfuscated.to_owned()) {
                    trace!(field = %key, %previous, obfuscated, "field redeclared");
                }
                self.declared_fields.push((key, obfuscated));
            }
            ProguardRecord::Method {
                ty,
                original,
                obfuscated,
                arguments,
                line_range,
            } => {
                let return_type = java_type_to_descriptor(ty);
                self.reference_type(&return_type);

                let mut parameters = String::new();
                for argument in argument_descriptors(arguments) {
                    self.reference_type(&argument);
                    parameters.push_str(&argument);
                }

                let key = MethodKey {
                    class: class.original.clone(),
                    name: original.to_owned(),
                    parameters,
                    return_type,
                };
                if let Some(previous) = self.methods.insert(key.clone(), obfuscated.to_owned()) {
                    if previous != obfuscated {
                        trace!(method = %key, %previous, obfuscated, "method redeclared");
                    }
                }

                let bucket = self
                    .lines
                    .entry(MethodKey {
                        class: class.obfuscated.clone(),
                        name: obfuscated.to_owned(),
                        parameters: key.parameters.clone(),
                        return_type: key.return_type.clone(),
                    })
                    .or_default();

                // A verbatim repeat of a member line is the same range again.
                let declared = DeclaredLines {
                    original,
                    line_range,
                };
                if bucket.seen.insert(declared) {
                    bucket.ranges.push(line_range);
                }

                self.declared_methods.push((key, obfuscated));
            }
            ProguardRecord::Header { .. } | ProguardRecord::Class { .. } => {}
        }
    }

    fn reference_type(&mut self, ty: &str) {
        if let Some(class) = class_element(ty) {
            if !self.referenced_types.contains(class) {
                self.referenced_types.insert(class.to_owned());
            }
        }
    }

    fn finish(self) -> SymbolTables {
        let Self {
            classes,
            fields,
            methods,
            declared_fields,
            declared_methods,
            lines,
            referenced_types,
            ..
        } = self;

        let original_classes = classes
            .iter()
            .map(|(original, obfuscated)| (obfuscated.clone(), original.clone()))
            .collect();

        let special_interfaces: HashSet<String> = referenced_types
            .into_iter()
            .filter(|class| !classes.contains_key(class))
            .collect();

        let mut original_fields = HashMap::with_capacity(declared_fields.len());
        for (key, obfuscated) in declared_fields {
            let obfuscated_key = FieldKey {
                class: remap_type(&key.class, &classes).into_owned(),
                name: obfuscated.to_owned(),
                ty: remap_type(&key.ty, &classes).into_owned(),
            };
            original_fields.insert(obfuscated_key, key);
        }

        let mut original_methods = HashMap::with_capacity(declared_methods.len());
        for (key, obfuscated) in declared_methods {
            let obfuscated_key = MethodKey {
                class: remap_type(&key.class, &classes).into_owned(),
                name: obfuscated.to_owned(),
                parameters: remap_parameters(&key.parameters, &classes).into_owned(),
                return_type: remap_type(&key.return_type, &classes).into_owned(),
            };
            original_methods.insert(obfuscated_key, key);
        }

        let mut method_lines: HashMap<MethodKey, Vec<ProguardLineRange>> =
            HashMap::with_capacity(lines.len());
        for (key, bucket) in lines {
            let parameters = remap_parameters(&key.parameters, &classes).into_owned();
            let return_type = remap_type(&key.return_type, &classes).into_owned();
            let key = MethodKey {
                parameters,
                return_type,
                ..key
            };
            method_lines
                .entry(key)
                .or_default()
                .extend(bucket.ranges);
        }

        debug!(
            classes = classes.len(),
            fields = fields.len(),
            methods = methods.len(),
            method_lines = method_lines.len(),
            special_interfaces = special_interfaces.len(),
            "built proguard symbol tables"
        );

        SymbolTables {
            classes,
            original_classes,
            fields,
            original_fields,
            methods,
            original_methods,
            method_lines,
            special_interfaces,
        }
    }
}

//! Conversion between dotted Java names and dex descriptors.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

fn java_base_types(encoded_ty: char) -> Option<&'static str> {
    match encoded_ty {
        'Z' => Some("boolean"),
        'B' => Some("byte"),
        'C' => Some("char"),
        'S' => Some("short"),
        'I' => Some("int"),
        'J' => Some("long"),
        'F' => Some("float"),
        'D' => Some("double"),
        'V' => Some("void"),
        _ => None,
    }
}

fn java_base_descriptor(ty: &str) -> Option<char> {
    match ty {
        "boolean" => Some('Z'),
        "byte" => Some('B'),
        "char" => Some('C'),
        "short" => Some('S'),
        "int" => Some('I'),
        "long" => Some('J'),
        "float" => Some('F'),
        "double" => Some('D'),
        "void" => Some('V'),
        _ => None,
    }
}

/// Converts a Java class name to its JVM descriptor format.
///
/// For example, `java.lang.NullPointerException` becomes `Ljava/lang/NullPointerException;`.
pub fn class_name_to_descriptor(class: &str) -> String {
    let mut descriptor = String::with_capacity(class.len() + 2);
    descriptor.push('L');
    descriptor.push_str(&class.replace('.', "/"));
    descriptor.push(';');
    descriptor
}

/// Converts a Java type as written in a mapping file to its descriptor.
///
/// ```
/// use proguard_map::java_type_to_descriptor;
///
/// assert_eq!(java_type_to_descriptor("int"), "I");
/// assert_eq!(java_type_to_descriptor("java.lang.String[][]"), "[[Ljava/lang/String;");
/// ```
pub fn java_type_to_descriptor(ty: &str) -> String {
    let mut element = ty;
    let mut descriptor = String::with_capacity(ty.len() + 2);
    while let Some(inner) = element.strip_suffix("[]") {
        descriptor.push('[');
        element = inner;
    }

    match java_base_descriptor(element) {
        Some(base) => descriptor.push(base),
        None => descriptor.push_str(&class_name_to_descriptor(element)),
    }
    descriptor
}

/// Converts a comma separated argument list to the descriptors of its types.
pub(crate) fn argument_descriptors(arguments: &str) -> impl Iterator<Item = String> + '_ {
    arguments
        .split(',')
        .filter(|argument| !argument.is_empty())
        .map(java_type_to_descriptor)
}

/// Returns the class descriptor a type descriptor refers to, looking
/// through arrays.
pub(crate) fn class_element(descriptor: &str) -> Option<&str> {
    let element = descriptor.trim_start_matches('[');
    (element.starts_with('L') && element.ends_with(';')).then_some(element)
}

/// Splits the leading type off a sequence of type descriptors.
fn split_type_descriptor(descriptors: &str) -> Option<(&str, &str)> {
    let dimensions = descriptors.len() - descriptors.trim_start_matches('[').len();
    let element = &descriptors[dimensions..];

    let len = match element.chars().next()? {
        'L' => element.find(';')? + 1,
        'V' if dimensions > 0 => return None,
        token if java_base_types(token).is_some() => 1,
        _ => return None,
    };

    Some(descriptors.split_at(dimensions + len))
}

/// Splits the parameter section of a method descriptor into its types.
///
/// Returns `None` if `parameters` is not a valid sequence of descriptors.
pub(crate) fn split_type_descriptors(mut parameters: &str) -> Option<Vec<&str>> {
    let mut types = Vec::new();
    while !parameters.is_empty() {
        let (ty, rest) = split_type_descriptor(parameters)?;
        if ty == "V" {
            return None;
        }
        types.push(ty);
        parameters = rest;
    }
    Some(types)
}

fn is_type_descriptor(descriptor: &str) -> bool {
    matches!(split_type_descriptor(descriptor), Some((_, "")))
}

/// Rewrites the class referenced by a type descriptor through `classes`.
///
/// Arrays keep their dimensions, primitives and unknown classes are returned
/// unchanged.
pub(crate) fn remap_type<'a>(ty: &'a str, classes: &HashMap<String, String>) -> Cow<'a, str> {
    let element = ty.trim_start_matches('[');
    match classes.get(element) {
        Some(mapped) => {
            let dimensions = ty.len() - element.len();
            Cow::Owned(format!("{}{}", &ty[..dimensions], mapped))
        }
        None => Cow::Borrowed(ty),
    }
}

/// Rewrites every type in a parameter descriptor through `classes`.
pub(crate) fn remap_parameters<'a>(
    parameters: &'a str,
    classes: &HashMap<String, String>,
) -> Cow<'a, str> {
    let Some(types) = split_type_descriptors(parameters) else {
        return Cow::Borrowed(parameters);
    };

    let mut remapped = String::with_capacity(parameters.len());
    for ty in types {
        remapped.push_str(&remap_type(ty, classes));
    }
    Cow::Owned(remapped)
}

/// Splits `Lpkg/Class;.rest` into the owning class and `rest`.
fn split_owner(descriptor: &str) -> Option<(&str, &str)> {
    let pos = descriptor.find(";.")?;
    let (class, member) = descriptor.split_at(pos + 1);
    Some((class, &member[1..]))
}

/// A field descriptor of the form `Lpkg/Class;.name:Type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor<'a> {
    /// Descriptor of the owning class.
    pub class: &'a str,
    /// Name of the field.
    pub name: &'a str,
    /// Type descriptor of the field.
    pub ty: &'a str,
}

impl<'a> FieldDescriptor<'a> {
    /// Decomposes a field descriptor, `None` if it is malformed.
    ///
    /// ```
    /// use proguard_map::FieldDescriptor;
    ///
    /// let field = FieldDescriptor::parse("Lcom/foo/bar;.do1:I").unwrap();
    /// assert_eq!(field.class, "Lcom/foo/bar;");
    /// assert_eq!(field.name, "do1");
    /// assert_eq!(field.ty, "I");
    /// ```
    pub fn parse(descriptor: &'a str) -> Option<Self> {
        let (class, member) = split_owner(descriptor)?;
        let (name, ty) = member.split_once(':')?;
        if name.is_empty() || !is_type_descriptor(ty) {
            return None;
        }
        Some(Self { class, name, ty })
    }
}

impl fmt::Display for FieldDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.class, self.name, self.ty)
    }
}

/// A method descriptor of the form `Lpkg/Class;.name:(Params)Return`.
///
/// The name is kept verbatim, so methods inlined from other classes can be
/// addressed with their dotted name, e.g. `Lcom/foo/bar;.com.foo.Time.now:()J`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodDescriptor<'a> {
    /// Descriptor of the owning class.
    pub class: &'a str,
    /// Name of the method.
    pub name: &'a str,
    /// Concatenated parameter type descriptors.
    pub parameters: &'a str,
    /// Return type descriptor.
    pub return_type: &'a str,
}

impl<'a> MethodDescriptor<'a> {
    /// Decomposes a method descriptor, `None` if it is malformed.
    pub fn parse(descriptor: &'a str) -> Option<Self> {
        let (class, member) = split_owner(descriptor)?;
        let (name, signature) = member.split_once(':')?;
        let (parameters, return_type) = signature.strip_prefix('(')?.split_once(')')?;
        if name.is_empty()
            || !is_type_descriptor(return_type)
            || split_type_descriptors(parameters).is_none()
        {
            return None;
        }
        Some(Self {
            class,
            name,
            parameters,
            return_type,
        })
    }
}

impl fmt::Display for MethodDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}:({}){}",
            self.class, self.name, self.parameters, self.return_type
        )
    }
}

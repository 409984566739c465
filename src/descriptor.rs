//! Scanning and rewriting of JVM-style type descriptors.
//!
//! Field descriptors (`Ljava/lang/String;`, `[I`, ...) and method descriptors
//! (`(ILjava/lang/String;)V`, ...) are kept as plain strings throughout the
//! crate; this module provides the few structural operations the index and the
//! translator need: enumerating the class names a descriptor references,
//! rewriting those names in place, and counting method parameters. Nothing
//! here validates descriptors beyond what those operations require - the input
//! collaborator is trusted to hand over well-formed strings.

/// Returns every class internal name referenced by a descriptor, in order.
///
/// Works for field and method descriptors alike; array dimensions are skipped
/// and only `L...;` object types contribute a name. Repeated references are
/// returned repeatedly.
///
/// # Examples
///
/// ```rust
/// let classes = classcope::descriptor::classes_in("(Lnone/a;I[Lnone/b;)Lnone/a;");
/// assert_eq!(classes, vec!["none/a", "none/b", "none/a"]);
/// ```
#[must_use]
pub fn classes_in(descriptor: &str) -> Vec<&str> {
    let bytes = descriptor.as_bytes();
    let mut names = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'L' {
            if let Some(end) = descriptor[i + 1..].find(';') {
                names.push(&descriptor[i + 1..i + 1 + end]);
                i += end + 2;
                continue;
            }
        }
        i += 1;
    }
    names
}

/// Rewrites every class name in a descriptor through the given function.
///
/// The function receives each referenced class name and returns the
/// replacement, or `None` to keep the name unchanged. Everything that is not
/// an object-type class name is copied through verbatim.
pub fn rewrite_classes<F>(descriptor: &str, mut rename: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let bytes = descriptor.as_bytes();
    let mut out = String::with_capacity(descriptor.len());
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'L' {
            if let Some(end) = descriptor[i + 1..].find(';') {
                let name = &descriptor[i + 1..i + 1 + end];
                out.push_str(&descriptor[copied..=i]);
                match rename(name) {
                    Some(renamed) => out.push_str(&renamed),
                    None => out.push_str(name),
                }
                out.push(';');
                i += end + 2;
                copied = i;
                continue;
            }
        }
        i += 1;
    }
    out.push_str(&descriptor[copied..]);
    out
}

/// Returns `true` if any class name in the descriptor matches `class_name`.
#[must_use]
pub fn mentions_class(descriptor: &str, class_name: &str) -> bool {
    classes_in(descriptor).iter().any(|name| *name == class_name)
}

/// Counts the parameters of a method descriptor.
///
/// Array dimensions do not add parameters; `[[I` is a single parameter. A
/// descriptor without a parameter list yields zero.
#[must_use]
pub fn parameter_count(method_descriptor: &str) -> usize {
    let Some(open) = method_descriptor.find('(') else {
        return 0;
    };
    let Some(close) = method_descriptor.find(')') else {
        return 0;
    };
    let params = &method_descriptor.as_bytes()[open + 1..close];

    let mut count = 0;
    let mut i = 0;
    while i < params.len() {
        match params[i] {
            b'[' => i += 1,
            b'L' => {
                count += 1;
                while i < params.len() && params[i] != b';' {
                    i += 1;
                }
                i += 1;
            }
            _ => {
                count += 1;
                i += 1;
            }
        }
    }
    count
}

/// Extracts the class name of a plain object-type field descriptor.
///
/// Returns `Some` only for a bare `L...;` descriptor; primitives and arrays
/// yield `None`. This mirrors how captured-field types are gathered during
/// outer-class recovery.
#[must_use]
pub fn type_class(field_descriptor: &str) -> Option<&str> {
    field_descriptor
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
}

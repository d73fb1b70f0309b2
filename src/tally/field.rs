use std::collections::{BTreeMap, HashMap};

/// A named, read-only view of one string value on a record.
pub trait Field<R: ?Sized> {
    fn name(&self) -> &str;
    fn get<'r>(&self, record: &'r R) -> Option<&'r str>;
}

/// Records whose fields can be looked up by name at runtime.
pub trait Record {
    fn value(&self, field: &str) -> Option<&str>;
}

impl Record for BTreeMap<String, String> {
    fn value(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

impl Record for HashMap<String, String> {
    fn value(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

/// Key a [`Record`] by field name.
#[derive(Clone, Copy, Debug)]
pub struct Named<'a>(pub &'a str);

impl<R: Record + ?Sized> Field<R> for Named<'_> {
    fn name(&self) -> &str {
        self.0
    }

    fn get<'r>(&self, record: &'r R) -> Option<&'r str> {
        record.value(self.0)
    }
}

/// Key built from a closure; see [`accessor`].
pub struct Accessor<F> {
    name: &'static str,
    f: F,
}

/// Wrap a field-accessor closure so it can key a tabulation.
pub fn accessor<R, F>(name: &'static str, f: F) -> Accessor<F>
where
    F: Fn(&R) -> &str,
{
    Accessor { name, f }
}

impl<R, F> Field<R> for Accessor<F>
where
    F: Fn(&R) -> &str,
{
    fn name(&self) -> &str {
        self.name
    }

    fn get<'r>(&self, record: &'r R) -> Option<&'r str> {
        Some((self.f)(record))
    }
}

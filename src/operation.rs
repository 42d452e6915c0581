//! Operation descriptors: what a single API call looks like on the wire and
//! which status codes it may come back with.
use serde::de::DeserializeOwned;

use crate::Result;

/// HTTP methods the Firecracker API uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Patch,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of an operation's response table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expect {
    /// Success without a body. The body is never read.
    NoContent(u16),
    /// Success whose body decodes into the operation's output.
    Output(u16),
    /// Failure whose body decodes into an [`ApiError`](crate::models::ApiError).
    /// The label names the variant in failure descriptions, e.g. `BadRequest`.
    Fault(u16, &'static str),
    /// Any code not listed elsewhere in the table. Carries an error payload and
    /// counts as a success only for 2xx codes.
    Default,
}

impl Expect {
    pub fn code(&self) -> Option<u16> {
        match *self {
            Expect::NoContent(code) | Expect::Output(code) | Expect::Fault(code, _) => Some(code),
            Expect::Default => None,
        }
    }
}

/// Static description of one API operation.
#[derive(Debug, PartialEq, Eq)]
pub struct Descriptor {
    /// Operation id as the API schema names it, e.g. `putGuestDriveByID`.
    pub id: &'static str,
    pub method: Method,
    /// Path template, e.g. `/drives/{drive_id}`.
    pub path: &'static str,
    /// Response table in schema order.
    pub responses: &'static [Expect],
}

impl Descriptor {
    /// Exact entries always win; the default entry is only a fallback.
    pub fn lookup(&self, code: u16) -> Option<&Expect> {
        self.responses
            .iter()
            .find(|expect| expect.code() == Some(code))
            .or_else(|| self.responses.iter().find(|e| **e == Expect::Default))
    }
}

/// An API call that can be sent to Firecracker and whose reply can be dispatched.
pub trait Operation {
    /// Body of the successful `Output` variant.
    type Output: DeserializeOwned;

    const DESCRIPTOR: &'static Descriptor;

    /// Request path with the template parameters filled in.
    fn path(&self) -> String;

    /// JSON request body, if the operation sends one.
    fn body(&self) -> Result<Option<String>>;
}

/// Declares an operation type together with its descriptor.
///
/// The descriptor constant is named after the type in upper snake case, so
/// `PutGuestDriveById` gets `PUT_GUEST_DRIVE_BY_ID`.
macro_rules! operation {
    // without body
    (
        $(#[$meta:meta])*
        $name:ident, $id:literal, $method:ident $path:literal,
        output = $output:ty,
        [$($expect:expr),* $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            pub fn new() -> Self {
                Self
            }
        }

        $crate::operation::operation!(@descriptor $name, $id, $method, $path, [$($expect),*]);

        impl $crate::operation::Operation for $name {
            type Output = $output;
            const DESCRIPTOR: &'static $crate::operation::Descriptor =
                &paste::paste! { [<$name:snake:upper>] };

            fn path(&self) -> String {
                $path.to_string()
            }

            fn body(&self) -> $crate::Result<Option<String>> {
                Ok(None)
            }
        }
    };
    // with body
    (
        $(#[$meta:meta])*
        $name:ident, $id:literal, $method:ident $path:literal,
        body = $body:ty,
        output = $output:ty,
        [$($expect:expr),* $(,)?]
    ) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone)]
        pub struct $name(pub $body);

        impl $name {
            pub fn new(body: $body) -> Self {
                Self(body)
            }
        }

        $crate::operation::operation!(@descriptor $name, $id, $method, $path, [$($expect),*]);

        impl $crate::operation::Operation for $name {
            type Output = $output;
            const DESCRIPTOR: &'static $crate::operation::Descriptor =
                &paste::paste! { [<$name:snake:upper>] };

            fn path(&self) -> String {
                $path.to_string()
            }

            fn body(&self) -> $crate::Result<Option<String>> {
                $crate::operation::encode_body(&self.0).map(Some)
            }
        }
    };
    // with body and a path parameter taken from the body
    (
        $(#[$meta:meta])*
        $name:ident, $id:literal, $method:ident $path:literal,
        body = $body:ty,
        param = $param:ident,
        output = $output:ty,
        [$($expect:expr),* $(,)?]
    ) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone)]
        pub struct $name(pub $body);

        impl $name {
            pub fn new(body: $body) -> Self {
                Self(body)
            }
        }

        $crate::operation::operation!(@descriptor $name, $id, $method, $path, [$($expect),*]);

        impl $crate::operation::Operation for $name {
            type Output = $output;
            const DESCRIPTOR: &'static $crate::operation::Descriptor =
                &paste::paste! { [<$name:snake:upper>] };

            fn path(&self) -> String {
                $path.replace(concat!("{", stringify!($param), "}"), &self.0.$param)
            }

            fn body(&self) -> $crate::Result<Option<String>> {
                $crate::operation::encode_body(&self.0).map(Some)
            }
        }
    };
    (@descriptor $name:ident, $id:literal, $method:ident, $path:literal, [$($expect:expr),*]) => {
        paste::paste! {
            pub const [<$name:snake:upper>]: $crate::operation::Descriptor =
                $crate::operation::Descriptor {
                    id: $id,
                    method: $crate::operation::Method::$method,
                    path: $path,
                    responses: &[$($expect),*],
                };
        }
    };
}

pub(crate) use operation;

#[doc(hidden)]
pub fn encode_body<T: serde::Serialize>(body: &T) -> Result<String> {
    serde_json::to_string(body).map_err(|e| {
        let msg = format!("Fail to serialize request body: {e}");
        log::error!("{msg}");
        crate::Error::Encode(msg)
    })
}

#[cfg(test)]
mod test {
    use super::*;

    const SHUFFLED: Descriptor = Descriptor {
        id: "shuffled",
        method: Method::Put,
        path: "/shuffled",
        responses: &[Expect::Default, Expect::Fault(400, "BadRequest"), Expect::NoContent(204)],
    };

    #[test]
    fn test_exact_entry_beats_default() {
        assert_eq!(SHUFFLED.lookup(204), Some(&Expect::NoContent(204)));
        assert_eq!(SHUFFLED.lookup(400), Some(&Expect::Fault(400, "BadRequest")));
        assert_eq!(SHUFFLED.lookup(503), Some(&Expect::Default));
    }

    #[test]
    fn test_lookup_without_default() {
        const STRICT: Descriptor = Descriptor {
            id: "strict",
            method: Method::Get,
            path: "/strict",
            responses: &[Expect::Output(200)],
        };
        assert_eq!(STRICT.lookup(200), Some(&Expect::Output(200)));
        assert_eq!(STRICT.lookup(204), None);
    }
}

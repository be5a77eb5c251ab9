//! JVM generic signatures (`Signature` attributes) and their translation into a
//! [`bus_types::TypeStore`].
//!
//! ```
//! use bus_types::{ClassKind, Resolver, Type, TypeArgMap, TypeEnv, TypeStore};
//! use bus_types_signature::{parse_class_signature, DeclarationLoader};
//!
//! let mut store = TypeStore::with_minimal_jdk();
//! let sig = parse_class_signature("Ljava/util/ArrayList<Ljava/lang/String;>;").unwrap();
//! let names = DeclarationLoader::new(&mut store)
//!     .define_class("com.example.Names", ClassKind::Class, &sig)
//!     .unwrap();
//!
//! let list = store.class_id("java.util.List").unwrap();
//! let e = store.class(list).unwrap().type_params[0];
//! let map = Resolver::new(&store)
//!     .resolve_arguments(&Type::class(names), list, &TypeArgMap::new())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(map.get(e), Some(&Type::class(store.well_known().string)));
//! ```

mod descriptor;
mod error;
mod signature;
mod translate;

pub use descriptor::parse_field_descriptor;
pub use error::{Result, SignatureError};
pub use signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    ClassTypeSignature, MethodSignature, SimpleClassTypeSignature, TypeArgument, TypeParameter,
    TypeSignature,
};
pub use translate::{field_type, ty_from_type_sig, DeclarationLoader, MethodType, TypeVarScope};

use super::{DEFAULT_SUBTYPE, HandleDescriptor, HandleRegistry, HandleRegistryBuilder, Side};

/// Declares the built-in handle lists, one `(subtype, side) => [..]` entry each.
macro_rules! handle_table {
    ( $( ($subtype:expr, $side:ident) => [ $( $handle:expr ),* $(,)? ] ),* $(,)? ) => {
        pub(super) fn registry() -> HandleRegistry {
            HandleRegistryBuilder::default()
                $( .with_handles($subtype, Side::$side, vec![ $( $handle ),* ]) )*
                .build()
        }
    };
}

fn left(id: &str, label: &str, icon: &str) -> HandleDescriptor {
    HandleDescriptor::new(Side::Left, id, label, icon)
}

fn right(id: &str, label: &str, icon: &str) -> HandleDescriptor {
    HandleDescriptor::new(Side::Right, id, label, icon)
}

handle_table! {
    (DEFAULT_SUBTYPE, Left) => [
        left("4", "Samling", "text_fields").array(),
        right("3", "Element", "text_fields"),
    ],
    ("subflow-reduce", Left) => [
        left("4", "Samling", "tag").array(),
        right("400", "Element A", "tag"),
        right("500", "Element B", "tag"),
    ],

    // Secondary ports on the container's right bar
    ("subflow-map", Right) => [
        left("4", "Nytt element", "data_object"),
        right("400", "Ny samling", "data_object").array(),
    ],
    ("subflow-filter", Right) => [
        left("4", "Skal være med", "toggle_on"),
        right("400", "Filtert samling", "text_fields").array(),
    ],
    ("subflow-reduce", Right) => [
        left("4", "Sammenslått verdi", "text_fields"),
        right("400", "Sammenslått verdi", "text_fields"),
    ],
    ("subflow-find-first", Right) => [
        left("4", "Betingelse", "toggle_on"),
        right("400", "Funnet element", "text_fields").optional(),
    ],
}

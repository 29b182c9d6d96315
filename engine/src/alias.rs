//! Display pseudonyms. Generated once per client, then cached in the
//! mirror so a reload keeps the same name.

use rand::Rng;

use crate::mirror::Mirror;

const ALIASES: [&str; 10] = [
    "Cupid",
    "Heart",
    "LoveBird",
    "Dreamer",
    "Romeo",
    "Juliet",
    "SecretAdmirer",
    "Starlight",
    "Honey",
    "Petal",
];

pub fn generate_alias() -> String {
    let mut rng = rand::thread_rng();
    let name = ALIASES[rng.gen_range(0..ALIASES.len())];
    let num = rng.gen_range(1..=99u32);
    format!("{name}{num}")
}

/// The client's pseudonym: cached value if present, freshly generated and
/// cached otherwise.
pub fn client_alias(mirror: &Mirror) -> String {
    if let Some(alias) = mirror.alias() {
        return alias;
    }
    let alias = generate_alias();
    mirror.save_alias(&alias);
    alias
}

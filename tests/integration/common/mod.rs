use envstruct::{Envstruct, EnvstructBuilder, MockEnv, Yaml};

/// An envstruct reading from `vars` only, with prefix `prefix`, tag key
/// `tag` and YAML unmarshaling, the way most scenarios are set up.
pub fn builder<const N: usize>(vars: [(&str, &str); N]) -> EnvstructBuilder<Yaml> {
    Envstruct::builder()
        .prefix("prefix")
        .tag_key("tag")
        .unmarshaler(Yaml)
        .source(MockEnv::from_pairs(vars))
}

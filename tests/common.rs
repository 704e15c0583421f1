use std::path::PathBuf;

use insnfmt::InsnDescription;
use insnfmt::loader::DescriptionLoader;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

pub fn load_sample() -> Vec<InsnDescription> {
    DescriptionLoader::new()
        .load_file(fixture_path("loongarch-sample.txt"))
        .expect("sample descriptions load")
}

pub fn find<'a>(descs: &'a [InsnDescription], mnemonic: &str) -> &'a InsnDescription {
    descs
        .iter()
        .find(|desc| desc.mnemonic == mnemonic)
        .unwrap_or_else(|| panic!("sample is missing '{mnemonic}'"))
}

#![no_main]
use frag_pack::Codec;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = Codec::default().decode(data);
});

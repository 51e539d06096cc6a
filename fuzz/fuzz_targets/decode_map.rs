#![no_main]
use libfuzzer_sys::fuzz_target;
use map_raster::MapConverter;

fuzz_target!(|data: &[u8]| {
    let _ = MapConverter::default().convert(data);
});

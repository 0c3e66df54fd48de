use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

pub mod read {
    use aurora_archive::{ErfArchive, ResourceContainer};
    use divan::Bencher;
    use std::io::Read;

    fn get_input() -> Vec<u8> {
        std::fs::read(format!(
            "{}/resources/taris.mod",
            env!("CARGO_MANIFEST_DIR")
        ))
        .unwrap()
    }

    #[divan::bench]
    fn open(bencher: Bencher) {
        bencher.with_inputs(get_input).bench_values(|data| {
            divan::black_box(ErfArchive::new(data).unwrap());
        });
    }

    #[divan::bench]
    fn read_file_first(bencher: Bencher) {
        let erf = ErfArchive::new(get_input()).unwrap();
        bencher.bench_local(move || {
            let mut buffer = Vec::new();
            let mut file = erf.by_index(0).unwrap();
            file.read_to_end(&mut buffer).unwrap();
        });
    }

    #[divan::bench]
    fn read_file_all(bencher: Bencher) {
        let erf = ErfArchive::new(get_input()).unwrap();
        let keys = erf.keys();
        bencher.bench_local(move || {
            for key in &keys {
                divan::black_box(erf.read(key).unwrap());
            }
        });
    }
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use proguard_map::ProguardMapping;

/// A synthetic mapping with `classes` classes of a few members each.
fn mapping(classes: usize) -> String {
    let mut mapping = String::from("# compiler: R8\n# min_api: 21\n");
    for i in 0..classes {
        mapping.push_str(&format!("com.example.pkg{}.Class{i} -> a.b{i}:\n", i % 17));
        mapping.push_str(&format!("    com.example.pkg0.Class0 field{i} -> a\n"));
        mapping.push_str("    1:1:void <init>():12:12 -> <init>\n");
        mapping.push_str(&format!(
            "    2:5:java.lang.String describe(int,com.example.pkg0.Class0[]):40:43 -> b{i}\n"
        ));
        mapping.push_str("    6:6:long com.example.Time.now():66:66 -> c\n");
        mapping.push_str("    6:6:boolean isExpired():490 -> c\n");
    }
    mapping
}

fn criterion_benchmark(c: &mut Criterion) {
    let source = mapping(2_000);

    c.bench_function("proguard records", |b| {
        b.iter(|| ProguardMapping::new(black_box(source.as_bytes())).iter().count())
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(25);
    targets = criterion_benchmark
}
criterion_main!(benches);

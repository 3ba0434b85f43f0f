use criterion::{Criterion, criterion_group, criterion_main};

pub fn criterion_benchmark(c: &mut Criterion) {
    use bibkit::postprocess::{Fields, PostprocessOptions, postprocess};
    use bibkit::references::CrossrefOptions;
    use bibkit::ser::{FormatOptions, to_string};
    use bibkit::{Dialect, Name, inherit_crossrefs, inherit_xdata, parse};

    let sample = std::fs::read_to_string("assets/sample.bib").unwrap();
    let xdata = std::fs::read_to_string("assets/xdata.bib").unwrap();
    let bib = parse(&sample, Dialect::Mixed).unwrap();
    let options = PostprocessOptions::default();

    c.bench_function("postprocess", |b| {
        b.iter(|| {
            let mut entries = bib.entries.clone();
            for entry in entries.iter_mut() {
                postprocess(entry, Fields::All, &options);
            }
            entries
        })
    });

    c.bench_function("names", |b| {
        b.iter(|| {
            Name::parse("de la Vall{\\'e}e Poussin, Jr., Charles Louis Xavier Joseph").unwrap()
        })
    });

    c.bench_function("crossref", |b| {
        b.iter(|| {
            let mut entries = bib.entries.clone();
            inherit_crossrefs(&mut entries, &CrossrefOptions::default());
            entries
        })
    });

    let xdata_bib = parse(&xdata, Dialect::Biblatex).unwrap();
    c.bench_function("xdata", |b| {
        b.iter(|| {
            let mut entries = xdata_bib.entries.clone();
            inherit_xdata(&mut entries).unwrap();
            entries
        })
    });

    let format = FormatOptions::default();
    c.bench_function("format", |b| b.iter(|| to_string(&bib, &format).unwrap()));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

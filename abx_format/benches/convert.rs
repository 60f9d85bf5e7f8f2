use abx_format::{
    buffer::{BufferList, ChannelBuffer},
    dispatch::Dispatcher,
    format::{AudioFormat, FormatFlags, FormatKind},
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

const BUFFER_SIZES: &[usize] = &[256, 512, 1024];
const SAMPLE_RATE: f64 = 44_100.0;
const CHANNELS: u32 = 2;

fn interleaved_source(bits: u32, bytes_per_sample: u32, flags: FormatFlags) -> AudioFormat {
    AudioFormat::new(FormatKind::Pcm, flags, bits, bytes_per_sample * CHANNELS, 1, SAMPLE_RATE, CHANNELS)
}

fn make_output(channels: usize, frames: usize) -> (Vec<Vec<f64>>, BufferList) {
    let mut backing: Vec<Vec<f64>> = (0..channels).map(|_| vec![0.0f64; frames]).collect();
    let mut list = BufferList::new();
    for buf in backing.iter_mut() {
        let byte_len = buf.len() * core::mem::size_of::<f64>();
        list.push(unsafe { ChannelBuffer::new(buf.as_mut_ptr() as *mut u8, byte_len) }).unwrap();
    }
    (backing, list)
}

fn bench_packed16(c: &mut Criterion) {
    let mut group = c.benchmark_group("packed_signed_16");
    for &frames in BUFFER_SIZES {
        group.throughput(Throughput::Elements((frames * CHANNELS as usize) as u64));
        group.bench_with_input(BenchmarkId::new("stereo", frames), &frames, |b, &frames| {
            let format = interleaved_source(16, 2, FormatFlags::SIGNED_INTEGER | FormatFlags::PACKED);
            let mut dispatcher = Dispatcher::new(format, frames).unwrap();
            let mut input_bytes = vec![0u8; frames * 2 * CHANNELS as usize];
            let mut input = BufferList::new();
            input.push(unsafe { ChannelBuffer::new(input_bytes.as_mut_ptr(), input_bytes.len()) }).unwrap();
            let (_backing, mut output) = make_output(CHANNELS as usize, frames);

            b.iter(|| {
                dispatcher.convert(black_box(&input), black_box(&mut output), black_box(frames));
            });
        });
    }
    group.finish();
}

fn bench_float32(c: &mut Criterion) {
    let mut group = c.benchmark_group("float32_native");
    for &frames in BUFFER_SIZES {
        group.throughput(Throughput::Elements((frames * CHANNELS as usize) as u64));
        group.bench_with_input(BenchmarkId::new("stereo", frames), &frames, |b, &frames| {
            let format = interleaved_source(32, 4, FormatFlags::FLOAT | FormatFlags::PACKED);
            let mut dispatcher = Dispatcher::new(format, frames).unwrap();
            let mut input_bytes = vec![0u8; frames * 4 * CHANNELS as usize];
            let mut input = BufferList::new();
            input.push(unsafe { ChannelBuffer::new(input_bytes.as_mut_ptr(), input_bytes.len()) }).unwrap();
            let (_backing, mut output) = make_output(CHANNELS as usize, frames);

            b.iter(|| {
                dispatcher.convert(black_box(&input), black_box(&mut output), black_box(frames));
            });
        });
    }
    group.finish();
}

fn bench_low_aligned_24_in_32(c: &mut Criterion) {
    let mut group = c.benchmark_group("low_aligned_24_in_32");
    for &frames in BUFFER_SIZES {
        group.throughput(Throughput::Elements((frames * CHANNELS as usize) as u64));
        group.bench_with_input(BenchmarkId::new("stereo", frames), &frames, |b, &frames| {
            let format = AudioFormat::new(
                FormatKind::Pcm,
                FormatFlags::SIGNED_INTEGER | FormatFlags::NON_INTERLEAVED,
                24,
                4,
                1,
                SAMPLE_RATE,
                CHANNELS,
            );
            let mut dispatcher = Dispatcher::new(format, frames).unwrap();
            let mut input_bytes = vec![0u8; frames * 4 * CHANNELS as usize];
            let mut input = BufferList::new();
            for chunk in input_bytes.chunks_mut(frames * 4) {
                input.push(unsafe { ChannelBuffer::new(chunk.as_mut_ptr(), chunk.len()) }).unwrap();
            }
            let (_backing, mut output) = make_output(CHANNELS as usize, frames);

            b.iter(|| {
                dispatcher.convert(black_box(&input), black_box(&mut output), black_box(frames));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_packed16, bench_float32, bench_low_aligned_24_in_32);
criterion_main!(benches);

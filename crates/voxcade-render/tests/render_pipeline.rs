//! End-to-end render tests against directory and archive sources.

mod common;

use std::fs;

use common::{read_pcm16, write_clip, write_constant, WavDecoder};
use pretty_assertions::assert_eq;
use voxcade_archive::{pack, ArchiveStore, ErrorKind};
use voxcade_render::{
    render, render_to_file, render_to_vec, sentence_from_text, AudioFormat, ClipSource,
    RenderError, SentenceOptions,
};

fn plain_options(gap_ms: f64) -> SentenceOptions {
    SentenceOptions {
        gap_ms,
        overlap_ms: 0.0,
        voice_delay_ms: 0.0,
        speed_percent: 100.0,
        pitch_semitones: 0.0,
        reverb_level: 0.0,
        enable_background: false,
    }
}

fn one_two_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let format = AudioFormat::mono(16000);
    write_constant(dir.path(), "one.ogg", format, 16000, 0.5);
    write_constant(dir.path(), "two.ogg", format, 16000, 0.5);
    dir
}

#[test]
fn test_two_words_end_to_end() {
    let clips = one_two_dir();
    let out = tempfile::tempdir().unwrap();
    let output_path = out.path().join("nested/sentence.wav");

    let source = ClipSource::directory(clips.path()).unwrap();
    let rendered = render_to_file(
        &source,
        &WavDecoder,
        &["one", "two"],
        &plain_options(100.0),
        &output_path,
    )
    .unwrap();

    assert_eq!(rendered.format, AudioFormat::mono(16000));
    assert_eq!(rendered.samples.len(), 33600);
    assert!(rendered.samples[..16000].iter().all(|&s| (s - 0.5).abs() < 1e-6));
    assert!(rendered.samples[16000..17600].iter().all(|&s| s == 0.0));
    assert!(rendered.samples[17600..].iter().all(|&s| (s - 0.5).abs() < 1e-6));

    let (format, pcm) = read_pcm16(&fs::read(&output_path).unwrap());
    assert_eq!(format, AudioFormat::mono(16000));
    assert_eq!(pcm.len(), 33600);
    assert!(pcm[..16000].iter().all(|&s| (s - 16384).abs() <= 1));
    assert!(pcm[16000..17600].iter().all(|&s| s == 0));
    assert!(pcm[17600..].iter().all(|&s| (s - 16384).abs() <= 1));
}

#[test]
fn test_silence_matches_gap() {
    let dir = tempfile::tempdir().unwrap();
    let format = AudioFormat::mono(22050);
    write_constant(dir.path(), "a.ogg", format, 100, 0.3);
    write_constant(dir.path(), "b.ogg", format, 100, 0.3);
    let source = ClipSource::directory(dir.path()).unwrap();

    // 22050 * 45 / 1000 = 992.25
    let rendered = render(&source, &WavDecoder, &["a", "b"], &plain_options(45.0)).unwrap();
    assert_eq!(rendered.samples.len(), 100 + 992 + 100);
    assert!(rendered.samples[100..1092].iter().all(|&s| s == 0.0));
}

#[test]
fn test_stereo_speed_keeps_interleaving() {
    let dir = tempfile::tempdir().unwrap();
    let format = AudioFormat::stereo(8000);
    let samples: Vec<f32> = (0..2000).map(|i| if i % 2 == 0 { 0.4 } else { -0.4 }).collect();
    write_clip(dir.path(), "hi.ogg", format, &samples);
    let source = ClipSource::directory(dir.path()).unwrap();

    let options = SentenceOptions {
        speed_percent: 200.0,
        ..plain_options(0.0)
    };
    let rendered = render(&source, &WavDecoder, &["hi"], &options).unwrap();
    assert_eq!(rendered.samples.len(), 1000);
    for frame in rendered.samples.chunks(2) {
        assert!((frame[0] - 0.4).abs() < 1e-6);
        assert!((frame[1] + 0.4).abs() < 1e-6);
    }
}

#[test]
fn test_channel_mismatch_writes_no_file() {
    let dir = tempfile::tempdir().unwrap();
    write_constant(dir.path(), "one.ogg", AudioFormat::mono(16000), 100, 0.5);
    write_constant(dir.path(), "two.ogg", AudioFormat::stereo(16000), 100, 0.5);
    let out = tempfile::tempdir().unwrap();
    let output_path = out.path().join("bad.wav");

    let source = ClipSource::directory(dir.path()).unwrap();
    let err = render_to_file(
        &source,
        &WavDecoder,
        &["one", "two"],
        &plain_options(50.0),
        &output_path,
    )
    .unwrap_err();

    match &err {
        RenderError::FormatMismatch {
            clip,
            expected,
            actual,
        } => {
            assert_eq!(clip, "two.ogg");
            assert_eq!(*expected, AudioFormat::mono(16000));
            assert_eq!(*actual, AudioFormat::stereo(16000));
        }
        other => panic!("expected format mismatch, got {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    assert!(!output_path.exists());
}

#[test]
fn test_missing_word_is_not_found() {
    let clips = one_two_dir();
    let out = tempfile::tempdir().unwrap();
    let output_path = out.path().join("missing.wav");
    let source = ClipSource::directory(clips.path()).unwrap();

    let err = render_to_file(
        &source,
        &WavDecoder,
        &["one", "three"],
        &plain_options(0.0),
        &output_path,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("three.ogg"));
    assert!(!output_path.exists());
}

#[test]
fn test_huge_voice_delay_is_usage_error() {
    let clips = one_two_dir();
    let out = tempfile::tempdir().unwrap();
    let output_path = out.path().join("delayed.wav");
    let source = ClipSource::directory(clips.path()).unwrap();

    let options = SentenceOptions {
        voice_delay_ms: 1e20,
        ..plain_options(0.0)
    };
    let err = render_to_file(&source, &WavDecoder, &["one"], &options, &output_path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
    assert!(err.to_string().contains("voice_delay_ms"));
    assert!(!output_path.exists());
}

#[test]
fn test_background_mix_stays_in_range() {
    let dir = tempfile::tempdir().unwrap();
    let format = AudioFormat::mono(1000);
    write_constant(dir.path(), "loud.ogg", format, 2000, 0.9);
    let bed: Vec<f32> = (0..5000).map(|i| if i % 2 == 0 { 0.9 } else { -0.9 }).collect();
    write_clip(dir.path(), "BG_5.ogg", format, &bed);
    let source = ClipSource::directory(dir.path()).unwrap();

    let options = SentenceOptions {
        voice_delay_ms: 500.0,
        enable_background: true,
        ..plain_options(0.0)
    };
    let rendered = render(&source, &WavDecoder, &["loud"], &options).unwrap();

    // 2.5 s total -> target 4 s, nearest candidate BG_5.
    assert_eq!(rendered.background.as_deref(), Some("BG_5.ogg"));
    assert_eq!(rendered.samples.len(), 5000);
    assert!(rendered.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    assert!((rendered.samples[0] - 0.9).abs() < 1e-6);
    assert_eq!(rendered.samples[500], 1.0);
    assert!((rendered.samples[501] - 0.0).abs() < 1e-6);
}

#[test]
fn test_speech_longer_than_background_extends_output() {
    let dir = tempfile::tempdir().unwrap();
    let format = AudioFormat::mono(1000);
    write_constant(dir.path(), "long.ogg", format, 6000, 0.2);
    write_constant(dir.path(), "BG_4.ogg", format, 4000, 0.1);
    let source = ClipSource::directory(dir.path()).unwrap();

    let options = SentenceOptions {
        voice_delay_ms: 250.0,
        enable_background: true,
        ..plain_options(0.0)
    };
    let rendered = render(&source, &WavDecoder, &["long"], &options).unwrap();
    assert_eq!(rendered.samples.len(), 6250);
    assert!((rendered.samples[100] - 0.1).abs() < 1e-6);
    assert!((rendered.samples[300] - 0.3).abs() < 1e-6);
    assert!((rendered.samples[6000] - 0.2).abs() < 1e-6);
}

#[test]
fn test_background_ties_favor_first_in_scan_order() {
    let dir = tempfile::tempdir().unwrap();
    let format = AudioFormat::mono(1000);
    write_constant(dir.path(), "ten.ogg", format, 10000, 0.1);
    // 10 s of speech, no BG_10: BG_12 and BG_8 are equally close and
    // BG_12 sorts first.
    write_constant(dir.path(), "BG_8.ogg", format, 8000, 0.2);
    write_constant(dir.path(), "BG_12.ogg", format, 12000, 0.3);
    let source = ClipSource::directory(dir.path()).unwrap();

    let options = SentenceOptions {
        enable_background: true,
        ..plain_options(0.0)
    };
    let rendered = render(&source, &WavDecoder, &["ten"], &options).unwrap();
    assert_eq!(rendered.background.as_deref(), Some("BG_12.ogg"));
    assert_eq!(rendered.samples.len(), 12000);
}

#[test]
fn test_exact_duration_background_preferred() {
    let dir = tempfile::tempdir().unwrap();
    let format = AudioFormat::mono(1000);
    write_constant(dir.path(), "word.ogg", format, 5500, 0.1);
    write_constant(dir.path(), "BG_5.ogg", format, 5000, 0.1);
    write_constant(dir.path(), "BG_6.ogg", format, 6000, 0.1);
    let source = ClipSource::directory(dir.path()).unwrap();

    let options = SentenceOptions {
        enable_background: true,
        ..plain_options(0.0)
    };
    let rendered = render(&source, &WavDecoder, &["word"], &options).unwrap();
    assert_eq!(rendered.background.as_deref(), Some("BG_6.ogg"));
}

#[test]
fn test_background_format_mismatch_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_constant(dir.path(), "word.ogg", AudioFormat::mono(1000), 1000, 0.1);
    write_constant(dir.path(), "BG_4.ogg", AudioFormat::mono(2000), 8000, 0.1);
    let source = ClipSource::directory(dir.path()).unwrap();

    let options = SentenceOptions {
        enable_background: true,
        ..plain_options(0.0)
    };
    let err = render(&source, &WavDecoder, &["word"], &options).unwrap_err();
    assert!(matches!(err, RenderError::FormatMismatch { ref clip, .. } if clip == "BG_4.ogg"));
}

#[test]
fn test_no_background_candidates_falls_back_to_speech() {
    let clips = one_two_dir();
    let source = ClipSource::directory(clips.path()).unwrap();
    let options = SentenceOptions {
        voice_delay_ms: 100.0,
        enable_background: true,
        ..plain_options(0.0)
    };
    let rendered = render(&source, &WavDecoder, &["one"], &options).unwrap();
    assert_eq!(rendered.background, None);
    assert_eq!(rendered.samples.len(), 1600 + 16000);
}

#[test]
fn test_reverb_boundaries() {
    let clips = one_two_dir();
    let source = ClipSource::directory(clips.path()).unwrap();

    let dry = render(&source, &WavDecoder, &["one"], &plain_options(0.0)).unwrap();
    let at_threshold = render(
        &source,
        &WavDecoder,
        &["one"],
        &SentenceOptions {
            reverb_level: 0.01,
            ..plain_options(0.0)
        },
    )
    .unwrap();
    assert_eq!(at_threshold.samples, dry.samples);

    let wet = render(
        &source,
        &WavDecoder,
        &["one"],
        &SentenceOptions {
            reverb_level: 50.0,
            ..plain_options(0.0)
        },
    )
    .unwrap();
    assert!(wet.samples.len() > dry.samples.len());
    assert!(wet.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
}

#[test]
fn test_archive_source_matches_directory_source() {
    let clips = one_two_dir();
    let work = tempfile::tempdir().unwrap();
    let archive_path = work.path().join("voice.data");
    pack::pack(clips.path(), &archive_path, |_| {}).unwrap();

    let store = ArchiveStore::new();
    let from_archive = ClipSource::open(&archive_path, &store).unwrap();
    let from_dir = ClipSource::open(clips.path(), &store).unwrap();
    assert!(matches!(from_archive, ClipSource::Archive { .. }));
    assert!(store.is_cached(&archive_path));

    let options = plain_options(100.0);
    let a = render(&from_archive, &WavDecoder, &["ONE", "two"], &options).unwrap();
    let b = render(&from_dir, &WavDecoder, &["one", "two"], &options).unwrap();
    assert_eq!(a.samples, b.samples);
    assert_eq!(a.format, b.format);
}

#[test]
fn test_corrupt_archive_keeps_corruption_kind() {
    let work = tempfile::tempdir().unwrap();
    let archive_path = work.path().join("broken.data");
    fs::write(&archive_path, b"NOTOGGDATA").unwrap();

    let store = ArchiveStore::new();
    let err = ClipSource::open(&archive_path, &store).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Corruption);
}

#[test]
fn test_render_to_vec_is_readable_wav() {
    let dir = tempfile::tempdir().unwrap();
    let format = AudioFormat::stereo(11025);
    write_constant(dir.path(), "hey.ogg", format, 1100, -0.25);
    let source = ClipSource::directory(dir.path()).unwrap();

    let bytes = render_to_vec(&source, &WavDecoder, &["hey"], &plain_options(0.0)).unwrap();
    let (read_format, pcm) = read_pcm16(&bytes);
    assert_eq!(read_format, format);
    assert_eq!(pcm.len(), 2200);
    assert!(pcm.iter().all(|&s| s == -8192));
}

#[test]
fn test_text_to_words_then_render() {
    let clips = one_two_dir();
    let source = ClipSource::directory(clips.path()).unwrap();
    let available = source.list_words().unwrap();
    assert_eq!(available, vec!["one", "two"]);

    let words = sentence_from_text("One, two... THREE! two?", &available);
    assert_eq!(words, vec!["one", "two", "two"]);

    let rendered = render(&source, &WavDecoder, &words, &plain_options(0.0)).unwrap();
    assert_eq!(rendered.samples.len(), 48000);
}

#[cfg(feature = "vorbis")]
#[test]
fn test_vorbis_clips_render_from_archive() {
    let fixture = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tone_left.ogg");
    let clips = tempfile::tempdir().unwrap();
    fs::copy(&fixture, clips.path().join("tone.ogg")).unwrap();
    fs::copy(&fixture, clips.path().join("hum.ogg")).unwrap();

    let work = tempfile::tempdir().unwrap();
    let archive_path = work.path().join("voice.data");
    pack::pack(clips.path(), &archive_path, |_| {}).unwrap();
    let store = ArchiveStore::new();
    let source = ClipSource::open(&archive_path, &store).unwrap();

    let bytes = render_to_vec(
        &source,
        &voxcade_render::VorbisDecoder::new(),
        &["tone", "hum"],
        &plain_options(100.0),
    )
    .unwrap();
    let (format, pcm) = read_pcm16(&bytes);
    assert_eq!(format, AudioFormat::stereo(22050));

    // 22016 frames per clip, 2205 frames of gap
    let clip_len = 22016 * 2;
    assert_eq!(pcm.len(), 2 * clip_len + 4410);
    assert!(pcm.iter().skip(1).step_by(2).all(|&s| s == 0));
    assert!(pcm[clip_len..clip_len + 4410].iter().all(|&s| s == 0));

    let left_peak = pcm[..clip_len].iter().step_by(2).map(|s| s.unsigned_abs()).max().unwrap();
    assert!((14000..18000).contains(&left_peak), "left peak {left_peak}");
    assert_eq!(&pcm[..clip_len], &pcm[clip_len + 4410..]);
}

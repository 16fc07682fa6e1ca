// Copyright 2025 the bramble developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end pipeline tests against real files on disk.
//!
//! Fixtures are generated into a temp directory per test: PNGs through the
//! `image` encoder, WAVs through `hound`, descriptors as JSON. The layout
//! mirrors a game's asset tree so relative-path resolution is exercised the
//! way production descriptors exercise it.

use bramble_core::asset::FileSystemSource;
use bramble_core::AssetError;
use bramble_lanes::{AssetEvent, AssetPipeline, PassOutcome};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::time::Duration;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode fixture png");
    bytes
}

fn wav_bytes(sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut bytes = Vec::new();
    {
        let mut writer =
            hound::WavWriter::new(Cursor::new(&mut bytes), spec).expect("create fixture wav");
        for &sample in samples {
            writer.write_sample(sample).expect("write fixture sample");
        }
        writer.finalize().expect("finalize fixture wav");
    }
    bytes
}

fn write_fixture(root: &Path, rel: &str, bytes: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(path, bytes).expect("write fixture");
}

fn pipeline_over(root: &Path) -> (AssetPipeline, tokio::runtime::Runtime) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .build()
        .expect("runtime");
    let source = Arc::new(FileSystemSource::new(root));
    (AssetPipeline::new(source, runtime.handle().clone()), runtime)
}

fn run_pass(pipeline: &AssetPipeline) -> PassOutcome {
    let (tx, rx) = mpsc::channel();
    pipeline
        .load_queued(move |outcome| tx.send(outcome).expect("test receiver alive"))
        .expect("no pass was running");
    rx.recv_timeout(Duration::from_secs(10)).expect("pass completes")
}

#[test]
fn tilemap_pass_discovers_and_loads_tileset_images() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(
        dir.path(),
        "maps/level1.json",
        br#"{
            "width": 4, "height": 4, "tilewidth": 8, "tileheight": 8,
            "tilesets": [
                { "firstgid": 1, "image": "tiles.png" },
                { "firstgid": 64, "tiles": [ { "id": 0, "image": "props/rock.png" } ] }
            ],
            "layers": []
        }"#,
    );
    write_fixture(dir.path(), "maps/tiles.png", &png_bytes(8, 8));
    write_fixture(dir.path(), "maps/props/rock.png", &png_bytes(4, 4));

    let (pipeline, _rt) = pipeline_over(dir.path());
    pipeline.enqueue_tilemap("level1", "maps/level1.json");

    let outcome = run_pass(&pipeline);
    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);
    assert_eq!(outcome.loaded, 3);

    let map = pipeline.tilemap("level1").expect("tilemap stored under key");
    assert_eq!(map.tilesets.len(), 2);

    // Tileset images are keyed by their path string as written in the map.
    let atlas = pipeline.image("tiles.png").expect("atlas image loaded");
    assert_eq!((atlas.width, atlas.height), (8, 8));
    let rock = pipeline.image("props/rock.png").expect("per-tile image loaded");
    assert_eq!((rock.width, rock.height), (4, 4));

    assert_eq!(pipeline.progress(), 1.0);
}

#[test]
fn spritesheet_image_is_keyed_by_sheet_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(
        dir.path(),
        "sheets/hero.json",
        br#"{
            "name": "hero",
            "spriteSheetImage": "hero.png",
            "spriteWidth": 16, "spriteHeight": 16,
            "columns": 4, "rows": 2,
            "animations": [
                { "name": "walk", "repeat": true,
                  "frames": [ { "index": 0, "duration": 5 }, { "index": 1 } ] }
            ]
        }"#,
    );
    write_fixture(dir.path(), "sheets/hero.png", &png_bytes(64, 32));

    let (pipeline, _rt) = pipeline_over(dir.path());
    pipeline.enqueue_spritesheet("hero", "sheets/hero.json");

    let outcome = run_pass(&pipeline);
    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);
    assert_eq!(outcome.loaded, 2);

    let sheet = pipeline.spritesheet("hero").expect("sheet stored under key");
    assert_eq!(sheet.animations.len(), 1);
    assert_eq!(sheet.animations[0].frames[0].duration, 5);
    // An omitted duration falls back to one logic step.
    assert_eq!(sheet.animations[0].frames[1].duration, 1);

    let backing = pipeline.image("hero").expect("backing image keyed by name");
    assert_eq!((backing.width, backing.height), (64, 32));
}

#[test]
fn mixed_pass_loads_every_lane_and_reports_completion() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(
        dir.path(),
        "maps/arena.json",
        br#"{ "width": 2, "height": 2, "tilewidth": 8, "tileheight": 8,
              "tilesets": [ { "firstgid": 1, "image": "arena.png" } ], "layers": [] }"#,
    );
    write_fixture(dir.path(), "maps/arena.png", &png_bytes(8, 8));
    write_fixture(dir.path(), "ui/cursor.png", &png_bytes(2, 2));
    write_fixture(dir.path(), "sfx/blip.wav", &wav_bytes(8000, &[0, 16384, -16384, 0]));

    let (pipeline, _rt) = pipeline_over(dir.path());
    pipeline.enqueue_tilemap("arena", "maps/arena.json");
    pipeline.enqueue_image("cursor", "ui/cursor.png");
    pipeline.enqueue_audio("blip", "sfx/blip.wav");

    assert_eq!(pipeline.progress(), 0.0);
    let outcome = run_pass(&pipeline);
    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);
    assert_eq!(outcome.loaded, 4);

    let clip = pipeline.audio("blip").expect("audio stored under key");
    assert_eq!(clip.sample_rate, 8000);
    assert_eq!(clip.samples.len(), 4);
    assert!((clip.samples[1] - 0.5).abs() < 1e-3);

    let events = pipeline.events().drain();
    assert!(events.contains(&AssetEvent::LoadCompleted));
    assert!(events.contains(&AssetEvent::LoadProgress(1.0)));
}

#[test]
fn broken_descriptor_fails_its_item_but_the_rest_still_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(dir.path(), "maps/broken.json", b"{ not json at all");
    write_fixture(dir.path(), "ui/ok.png", &png_bytes(1, 1));

    let (pipeline, _rt) = pipeline_over(dir.path());
    pipeline.enqueue_tilemap("broken", "maps/broken.json");
    pipeline.enqueue_image("ok", "ui/ok.png");

    let outcome = run_pass(&pipeline);
    assert_eq!(outcome.loaded, 1);
    assert_eq!(outcome.failed, 1);
    assert!(!outcome.is_success());

    assert!(matches!(
        pipeline.tilemap("broken"),
        Err(AssetError::NotFound { kind: "tilemap", .. })
    ));
    assert!(pipeline.image("ok").is_ok());
}

#[test]
fn unload_all_then_reload_works() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(dir.path(), "ui/icon.png", &png_bytes(3, 3));

    let (pipeline, _rt) = pipeline_over(dir.path());
    pipeline.enqueue_image("icon", "ui/icon.png");
    assert!(run_pass(&pipeline).is_success());
    assert!(pipeline.image("icon").is_ok());

    pipeline.unload_all().expect("no pass in flight");
    assert!(pipeline.image("icon").is_err());
    assert_eq!(pipeline.progress(), 0.0);

    pipeline.enqueue_image("icon", "ui/icon.png");
    assert!(run_pass(&pipeline).is_success());
    assert!(pipeline.image("icon").is_ok());
}

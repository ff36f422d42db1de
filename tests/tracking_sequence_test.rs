//! Hold-over behavior over frame sequences


use nalgebra::Matrix3;
use test_helpers::{assert_normalized, facing_frame, pose_frame, unit_screen_config, yawed_frame};
use webcam_gaze::{
    config::Config,
    error::{FrameError, IntersectionMiss},
    pipeline::{GazePipeline, GazeSession},
    pose::FrameInput,
    screen::Viewport,
    tracking::{FrameResult, TrackingState},
};

fn setup(grace_period_frames: u32) -> (GazePipeline, GazeSession) {
    let mut config: Config = unit_screen_config();
    config.tracking.grace_period_frames = grace_period_frames;
    (GazePipeline::new(&config).unwrap(), GazeSession::new(&config).unwrap())
}

fn looking_at(x: f64) -> FrameInput {
    // Hits normalized (0.5 + x, 0.5)
    facing_frame([x, 0.0, -1.0])
}

#[test]
fn test_short_gap_is_bridged() {
    let (pipeline, mut session) = setup(2);
    let frames = [
        looking_at(-0.4),
        looking_at(-0.3),
        FrameInput::NoFace,
        FrameInput::NoFace,
        looking_at(-0.2),
    ];

    let results: Vec<FrameResult> = frames.iter().map(|f| pipeline.process_frame(&mut session, f)).collect();

    assert!(matches!(results[0], FrameResult::Tracking(_)));
    assert!(matches!(results[1], FrameResult::Tracking(_)));
    assert!(results[2].is_held());
    assert!(results[3].is_held());
    assert_eq!(results[2].point(), results[1].point());
    assert_eq!(results[3].point(), results[1].point());
    assert!(matches!(results[4], FrameResult::Tracking(_)));
    assert_normalized(results[4].point().unwrap(), 0.3, 0.5);
}

#[test]
fn test_long_gap_stops_emitting() {
    let (pipeline, mut session) = setup(1);
    let frames = [
        looking_at(-0.4),
        looking_at(-0.3),
        FrameInput::NoFace,
        FrameInput::NoFace,
        looking_at(-0.2),
    ];

    let results: Vec<FrameResult> = frames.iter().map(|f| pipeline.process_frame(&mut session, f)).collect();

    assert!(results[2].is_held());
    assert_normalized(results[2].point().unwrap(), 0.2, 0.5);
    assert_eq!(results[3], FrameResult::NoResult);
    assert_eq!(session.state(), TrackingState::Tracking);
    assert_normalized(results[4].point().unwrap(), 0.3, 0.5);
}

#[test]
fn test_geometric_misses_count_as_lost_frames() {
    let (pipeline, mut session) = setup(1);
    let turned_away = yawed_frame([0.0, 0.0, -1.0], std::f64::consts::PI);

    pipeline.process_frame(&mut session, &looking_at(0.0));
    assert!(pipeline.process_frame(&mut session, &turned_away).is_held());
    assert_eq!(
        session.tracker().last_failure(),
        Some(&FrameError::NoIntersection(IntersectionMiss::Behind))
    );
    assert_eq!(pipeline.process_frame(&mut session, &turned_away), FrameResult::NoResult);
    assert_eq!(session.state(), TrackingState::Lost);
}

#[test]
fn test_malformed_pose_is_held_like_missing_face() {
    let mut nan_rotation = Matrix3::identity();
    nan_rotation[(0, 2)] = f64::NAN;
    let malformed = pose_frame([0.0, 0.0, -1.0], &nan_rotation);

    let run = |gap: &FrameInput| {
        let (pipeline, mut session) = setup(2);
        let frames = [looking_at(0.1), gap.clone(), gap.clone(), gap.clone(), looking_at(-0.1)];
        frames
            .iter()
            .map(|f| pipeline.process_frame(&mut session, f))
            .collect::<Vec<FrameResult>>()
    };

    let with_malformed = run(&malformed);
    let with_no_face = run(&FrameInput::NoFace);
    assert_eq!(with_malformed, with_no_face);
    assert!(with_malformed[1].is_held() && with_malformed[2].is_held());
    assert_eq!(with_malformed[3], FrameResult::NoResult);

    let (pipeline, mut session) = setup(2);
    pipeline.process_frame(&mut session, &looking_at(0.1));
    assert!(pipeline.process_frame(&mut session, &malformed).is_held());
    assert!(matches!(session.tracker().last_failure(), Some(FrameError::MalformedPose(_))));
}

#[test]
fn test_resize_during_hold_over() {
    let (pipeline, mut session) = setup(2);
    let fresh = pipeline.process_frame(&mut session, &looking_at(0.0));
    assert!((fresh.point().unwrap().pixel_x - 500.0).abs() < 1e-9);

    session.set_viewport(Viewport::new(2000, 2000));
    let held = pipeline.process_frame(&mut session, &FrameInput::NoFace);
    assert!(held.is_held());
    let point = held.point().unwrap();
    assert_normalized(point, 0.5, 0.5);
    assert!((point.pixel_x - 1000.0).abs() < 1e-9);
    assert!((point.pixel_y - 1000.0).abs() < 1e-9);
}

#[test]
fn test_no_face_before_first_detection() {
    let (pipeline, mut session) = setup(3);
    assert_eq!(session.state(), TrackingState::Idle);

    for _ in 0..5 {
        assert_eq!(pipeline.process_frame(&mut session, &FrameInput::NoFace), FrameResult::NoResult);
    }
    assert_eq!(session.state(), TrackingState::Acquiring);

    assert!(matches!(pipeline.process_frame(&mut session, &looking_at(0.1)), FrameResult::Tracking(_)));
    assert_eq!(session.state(), TrackingState::Tracking);
}

#[test]
fn test_disable_during_hold_over() {
    let (pipeline, mut session) = setup(5);
    pipeline.process_frame(&mut session, &looking_at(0.1));
    assert!(pipeline.process_frame(&mut session, &FrameInput::NoFace).is_held());

    session.disable();
    assert_eq!(session.state(), TrackingState::Idle);
    assert!(session.tracker().held_point().is_none());

    // The stale point never comes back
    assert_eq!(pipeline.process_frame(&mut session, &FrameInput::NoFace), FrameResult::NoResult);
    assert_eq!(session.state(), TrackingState::Acquiring);
}

#[test]
fn test_smoothing_does_not_leak_across_lost_tracking() {
    let mut config = unit_screen_config();
    config.tracking.grace_period_frames = 1;
    config.filter.kind = "moving_average".to_string();
    config.filter.moving_average_window = 4;
    let pipeline = GazePipeline::new(&config).unwrap();
    let mut session = GazeSession::new(&config).unwrap();

    pipeline.process_frame(&mut session, &looking_at(-0.4));
    let smoothed = pipeline.process_frame(&mut session, &looking_at(0.0));
    assert_normalized(smoothed.point().unwrap(), 0.3, 0.5);

    pipeline.process_frame(&mut session, &FrameInput::NoFace);
    pipeline.process_frame(&mut session, &FrameInput::NoFace);

    let fresh = pipeline.process_frame(&mut session, &looking_at(0.2));
    assert_normalized(fresh.point().unwrap(), 0.7, 0.5);
}

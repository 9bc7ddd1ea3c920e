// The playable character: movement, attack, collision, draw emission

use super::animation::{weapon_pose, AnimationClock, SpriteId, WEAPON_DST};
use super::state::{Facing, PlayerState};
use super::stats::PlayerStats;
use crate::core::math::Rect;
use crate::engine::assets::{AssetError, AssetSlot, ImageLoader, LoadedImage};
use crate::engine::input::DirectionalInput;
use crate::engine::renderer::{DrawSurface, TextureHandle};
use crate::game::level::CollisionBlock;
use glam::Vec2;

/// Body sprite sheet resource name
const BODY_SHEET: &str = "player.png";
/// Weapon sprite sheet resource name
const WEAPON_SHEET: &str = "lance.png";

/// The player character. Owns its position, velocity, animation and attack
/// state; reads input snapshots and collision blocks, and emits draw
/// parameters against a `DrawSurface`.
pub struct Player {
    /// Top-left corner in world units
    pub position: Vec2,
    /// Square extent (width == height)
    pub size: f32,
    /// World units per second, rebuilt from input every tick
    pub velocity: Vec2,
    /// Center point, recomputed from position and size each update
    pub center: Vec2,

    state: PlayerState,
    sprite: SpriteId,
    /// Active frame count. An override stored here, not on the shared
    /// region table: freezing the walk cycle on a no-input tick must not
    /// leak into other strips.
    frames: u32,
    clock: AnimationClock,
    stats: PlayerStats,

    body_sheet: AssetSlot<TextureHandle>,
    weapon_sheet: AssetSlot<TextureHandle>,
}

impl Player {
    /// Create a player at `position` and start both sprite sheet loads.
    /// The player is simulated from the first frame; it becomes visible
    /// once the sheets finish loading.
    pub fn new(position: Vec2, size: f32, loader: &ImageLoader) -> Self {
        let state = PlayerState::default();
        let sprite = SpriteId::walk(state.facing());

        Self {
            position,
            size,
            velocity: Vec2::ZERO,
            center: position + Vec2::splat(size / 2.0),
            state,
            sprite,
            frames: sprite.region().frame_count,
            clock: AnimationClock::default(),
            stats: PlayerStats::standard(),
            body_sheet: AssetSlot::Pending(loader.load_image(BODY_SHEET)),
            weapon_sheet: AssetSlot::Pending(loader.load_image(WEAPON_SHEET)),
        }
    }

    /// Poll both sprite sheet loads, uploading finished decodes through
    /// `upload`. Call once per frame before input handling.
    pub fn poll_assets<F>(&mut self, mut upload: F)
    where
        F: FnMut(&LoadedImage) -> Result<TextureHandle, AssetError>,
    {
        self.body_sheet.poll(&mut upload);
        self.weapon_sheet.poll(&mut upload);
    }

    /// Map this frame's directional key snapshot to velocity, facing and
    /// walk animation. Exactly one direction wins per frame, in priority
    /// order right > left > up > down. While attacking, input is ignored
    /// entirely and velocity stays zero.
    pub fn handle_input(&mut self, input: &DirectionalInput) {
        self.velocity = Vec2::ZERO;

        if self.state.is_attacking() {
            return;
        }

        if input.is_neutral() {
            // Freeze the walk cycle on whatever frame it is showing
            self.frames = 1;
            return;
        }

        let facing = if input.right {
            self.velocity.x = self.stats.move_speed;
            Facing::Right
        } else if input.left {
            self.velocity.x = -self.stats.move_speed;
            Facing::Left
        } else if input.up {
            self.velocity.y = -self.stats.move_speed;
            Facing::Up
        } else {
            self.velocity.y = self.stats.move_speed;
            Facing::Down
        };

        self.state = self.state.face(facing);
        self.sprite = SpriteId::walk(facing);
        self.frames = self.sprite.region().frame_count;
    }

    /// Enter the attack state, posing toward the current facing. Gating
    /// (press edge, cooldown) is the caller's job; calling mid-attack only
    /// snaps the animation back to the first frame.
    pub fn attack(&mut self) {
        let facing = self.state.facing();
        self.sprite = SpriteId::attack(facing);
        self.frames = self.sprite.region().frame_count;
        self.clock.restart();
        self.state = self.state.begin_attack();
    }

    /// Advance the simulation by `dt` seconds against the given collision
    /// blocks. A zero (or negative) delta is a no-op.
    pub fn update(&mut self, dt: f32, blocks: &[CollisionBlock]) {
        if dt <= 0.0 {
            return;
        }

        let (state, attack_ended) = self.state.advance(dt, self.stats.attack_duration);
        self.state = state;
        if attack_ended {
            self.sprite = SpriteId::walk(self.state.facing());
            self.frames = self.sprite.region().frame_count;
        }

        self.clock.advance(dt, self.frames, self.stats.frame_interval);

        self.position.x += self.velocity.x * dt;
        self.resolve_horizontal_collisions(blocks);

        self.position.y += self.velocity.y * dt;
        self.resolve_vertical_collisions(blocks);

        self.center = self.bounds().center();
    }

    /// Emit this frame's draw parameters. Nothing is drawn until both
    /// sprite sheets are ready.
    pub fn draw(&self, surface: &mut impl DrawSurface) {
        let (Some(body), Some(weapon)) = (self.body_sheet.get(), self.weapon_sheet.get()) else {
            return;
        };

        let src = self
            .sprite
            .region()
            .frame_src(self.clock.frame, self.stats.frame_sample_inset);
        surface.blit(*body, src, self.bounds());

        if self.state.is_attacking() {
            let pose = weapon_pose(self.state.facing());
            surface.push_transform(self.position + pose.offset, pose.angle);
            surface.blit_full(*weapon, WEAPON_DST);
            surface.pop_transform();
        }
    }

    /// The player's bounding box
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size, self.size)
    }

    pub fn facing(&self) -> Facing {
        self.state.facing()
    }

    pub fn is_attacking(&self) -> bool {
        self.state.is_attacking()
    }

    pub fn current_sprite(&self) -> SpriteId {
        self.sprite
    }

    pub fn frame_count(&self) -> u32 {
        self.frames
    }

    /// Push the player out of the first block it overlaps on the x axis.
    /// Horizontal contact does not zero the velocity: after a side bump
    /// the x velocity survives until the next input tick rebuilds it.
    fn resolve_horizontal_collisions(&mut self, blocks: &[CollisionBlock]) {
        let buffer = self.stats.collision_buffer;
        for block in blocks {
            let bounds = block.bounds();
            if bounds.is_degenerate() || !self.bounds().touches(&bounds) {
                continue;
            }

            if self.velocity.x < 0.0 {
                self.position.x = bounds.right() + buffer;
                break;
            }
            if self.velocity.x > 0.0 {
                self.position.x = bounds.x - self.size - buffer;
                break;
            }
        }
    }

    /// Push the player out of the first block it overlaps on the y axis,
    /// zeroing the y velocity on contact.
    fn resolve_vertical_collisions(&mut self, blocks: &[CollisionBlock]) {
        let buffer = self.stats.collision_buffer;
        for block in blocks {
            let bounds = block.bounds();
            if bounds.is_degenerate() || !self.bounds().touches(&bounds) {
                continue;
            }

            if self.velocity.y < 0.0 {
                self.velocity.y = 0.0;
                self.position.y = bounds.bottom() + buffer;
                break;
            }
            if self.velocity.y > 0.0 {
                self.velocity.y = 0.0;
                self.position.y = bounds.y - self.size - buffer;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const RIGHT: DirectionalInput = DirectionalInput {
        up: false,
        down: false,
        left: false,
        right: true,
    };
    const NEUTRAL: DirectionalInput = DirectionalInput {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// A player whose asset loads point nowhere; simulation-only tests
    /// never look at the slots.
    fn test_player(x: f32, y: f32) -> Player {
        let loader = ImageLoader::new(std::env::temp_dir().join("lancer-player-tests"));
        Player::new(Vec2::new(x, y), 16.0, &loader)
    }

    fn test_player_with_sheets(x: f32, y: f32) -> Player {
        let mut player = test_player(x, y);
        player.body_sheet = AssetSlot::Ready(TextureHandle::for_tests(0));
        player.weapon_sheet = AssetSlot::Ready(TextureHandle::for_tests(1));
        player
    }

    fn block(x: f32, y: f32, width: f32, height: f32) -> CollisionBlock {
        CollisionBlock::new(x, y, width, height)
    }

    #[test]
    fn test_input_sets_velocity_and_facing() {
        let mut player = test_player(0.0, 0.0);
        player.handle_input(&RIGHT);

        assert_eq!(player.velocity, Vec2::new(150.0, 0.0));
        assert_eq!(player.facing(), Facing::Right);
        assert_eq!(player.current_sprite(), SpriteId::WalkRight);
        assert_eq!(player.frame_count(), 4);
    }

    #[test]
    fn test_input_priority_right_beats_everything() {
        let mut player = test_player(0.0, 0.0);
        player.handle_input(&DirectionalInput {
            up: true,
            down: true,
            left: true,
            right: true,
        });

        assert_eq!(player.velocity, Vec2::new(150.0, 0.0));
        assert_eq!(player.facing(), Facing::Right);
    }

    #[test]
    fn test_input_priority_left_beats_vertical() {
        let mut player = test_player(0.0, 0.0);
        player.handle_input(&DirectionalInput {
            up: true,
            down: true,
            left: true,
            right: false,
        });

        assert_eq!(player.velocity, Vec2::new(-150.0, 0.0));
        assert_eq!(player.facing(), Facing::Left);
    }

    #[test]
    fn test_input_priority_up_beats_down() {
        let mut player = test_player(0.0, 0.0);
        player.handle_input(&DirectionalInput {
            up: true,
            down: true,
            left: false,
            right: false,
        });

        assert_eq!(player.velocity, Vec2::new(0.0, -150.0));
        assert_eq!(player.facing(), Facing::Up);
    }

    #[test]
    fn test_no_input_freezes_walk_cycle_in_place() {
        let mut player = test_player(40.0, 40.0);
        player.handle_input(&NEUTRAL);
        player.update(0.5, &[]);

        assert_eq!(player.position, Vec2::new(40.0, 40.0));
        assert_eq!(player.frame_count(), 1);
    }

    #[test]
    fn test_attack_resets_frame_and_poses() {
        for facing in [Facing::Down, Facing::Up, Facing::Left, Facing::Right] {
            let mut player = test_player(0.0, 0.0);
            // Walk long enough that the frame index is nonzero
            player.handle_input(&RIGHT);
            player.update(0.16, &[]);
            assert_eq!(player.clock.frame, 1);

            player.state = PlayerState::Idle { facing };
            player.attack();

            assert!(player.is_attacking());
            assert_eq!(player.clock.frame, 0);
            assert_eq!(player.current_sprite(), SpriteId::attack(facing));
            assert_eq!(player.frame_count(), 1);
        }
    }

    #[test]
    fn test_attack_ignores_input_and_pins_velocity() {
        let mut player = test_player(0.0, 0.0);
        player.attack();

        player.handle_input(&RIGHT);
        assert_eq!(player.velocity, Vec2::ZERO);

        player.update(0.1, &[]);
        assert_eq!(player.position, Vec2::ZERO);
        assert!(player.is_attacking());
    }

    #[test]
    fn test_attack_expires_after_duration() {
        let mut player = test_player(0.0, 0.0);
        player.state = PlayerState::Idle {
            facing: Facing::Left,
        };
        player.attack();

        // Accumulates to exactly the 0.3s duration; the pose holds until
        // the next update finds the timer expired
        player.update(0.15, &[]);
        player.update(0.15, &[]);
        assert!(player.is_attacking());

        player.update(0.01, &[]);
        assert!(!player.is_attacking());
        assert_eq!(player.current_sprite(), SpriteId::WalkLeft);
        assert_eq!(player.frame_count(), 4);
        assert_eq!(player.facing(), Facing::Left);
    }

    #[test]
    fn test_zero_delta_is_a_no_op() {
        let mut player = test_player(0.0, 0.0);
        player.handle_input(&RIGHT);
        player.update(0.0, &[]);

        assert_eq!(player.position, Vec2::ZERO);
        assert_eq!(player.clock.frame, 0);
    }

    #[test]
    fn test_open_field_integration_and_center() {
        let mut player = test_player(0.0, 0.0);
        player.handle_input(&RIGHT);
        player.update(1.0, &[]);

        assert_relative_eq!(player.position.x, 150.0);
        assert_eq!(player.position.y, 0.0);
        assert_relative_eq!(player.center.x, 158.0);
        assert_relative_eq!(player.center.y, 8.0);
    }

    #[test]
    fn test_right_collision_snaps_clear_and_keeps_velocity() {
        let mut player = test_player(0.0, 0.0);
        player.handle_input(&RIGHT);
        player.update(1.0, &[block(160.0, 0.0, 16.0, 16.0)]);

        assert_relative_eq!(player.position.x, 160.0 - 16.0 - 1e-4);
        // Horizontal contact leaves velocity alone (the vertical arm zeroes)
        assert_eq!(player.velocity.x, 150.0);
    }

    #[test]
    fn test_right_collision_never_penetrates() {
        let mut player = test_player(80.0, 0.0);
        player.handle_input(&RIGHT);
        player.update(0.1, &[block(100.0, 0.0, 16.0, 16.0)]);

        assert!(player.position.x + 16.0 <= 100.0);
        assert_abs_diff_eq!(player.position.x + 16.0, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_left_collision_snaps_to_block_right_edge() {
        let mut player = test_player(30.0, 0.0);
        player.handle_input(&DirectionalInput {
            left: true,
            ..NEUTRAL
        });
        player.update(0.1, &[block(0.0, 0.0, 16.0, 16.0)]);

        assert_relative_eq!(player.position.x, 16.0 + 1e-4);
        assert_eq!(player.velocity.x, -150.0);
    }

    #[test]
    fn test_down_collision_zeroes_vertical_velocity() {
        let mut player = test_player(0.0, 10.0);
        player.handle_input(&DirectionalInput {
            down: true,
            ..NEUTRAL
        });
        player.update(0.1, &[block(0.0, 40.0, 16.0, 16.0)]);

        assert_eq!(player.velocity.y, 0.0);
        assert_relative_eq!(player.position.y, 40.0 - 16.0 - 1e-4);
    }

    #[test]
    fn test_up_collision_snaps_below_block() {
        let mut player = test_player(0.0, 30.0);
        player.handle_input(&DirectionalInput {
            up: true,
            ..NEUTRAL
        });
        player.update(0.1, &[block(0.0, 0.0, 16.0, 16.0)]);

        assert_eq!(player.velocity.y, 0.0);
        assert_relative_eq!(player.position.y, 16.0 + 1e-4);
    }

    #[test]
    fn test_first_block_in_scan_order_wins() {
        let mut player = test_player(80.0, 0.0);
        player.handle_input(&RIGHT);
        let near = block(100.0, 0.0, 16.0, 16.0);
        let far = block(108.0, 0.0, 16.0, 16.0);
        player.update(0.1, &[far, near]);

        // `far` is scanned first and both overlap the moved player
        assert_relative_eq!(player.position.x, 108.0 - 16.0 - 1e-4);
    }

    #[test]
    fn test_degenerate_blocks_are_ignored() {
        let mut player = test_player(80.0, 0.0);
        player.handle_input(&RIGHT);
        player.update(0.1, &[block(100.0, 0.0, 0.0, 16.0)]);

        assert_relative_eq!(player.position.x, 95.0);
    }

    /// Draw surface that records emitted calls instead of rendering
    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Call {
        Blit {
            texture: TextureHandle,
            src: Rect,
            dst: Rect,
        },
        BlitFull {
            texture: TextureHandle,
            dst: Rect,
        },
        Push {
            translation: Vec2,
            rotation: f32,
        },
        Pop,
    }

    impl DrawSurface for RecordingSurface {
        fn blit(&mut self, texture: TextureHandle, src: Rect, dst: Rect) {
            self.calls.push(Call::Blit { texture, src, dst });
        }

        fn blit_full(&mut self, texture: TextureHandle, dst: Rect) {
            self.calls.push(Call::BlitFull { texture, dst });
        }

        fn push_transform(&mut self, translation: Vec2, rotation: f32) {
            self.calls.push(Call::Push {
                translation,
                rotation,
            });
        }

        fn pop_transform(&mut self) {
            self.calls.push(Call::Pop);
        }
    }

    #[test]
    fn test_draw_is_silent_until_both_sheets_load() {
        let player = test_player(0.0, 0.0);
        let mut surface = RecordingSurface::default();
        player.draw(&mut surface);
        assert!(surface.calls.is_empty());

        let mut player = test_player(0.0, 0.0);
        player.body_sheet = AssetSlot::Ready(TextureHandle::for_tests(0));
        player.draw(&mut surface);
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_draw_emits_current_frame() {
        let mut player = test_player_with_sheets(10.0, 20.0);
        player.handle_input(&RIGHT);
        player.update(0.16, &[]);

        let mut surface = RecordingSurface::default();
        player.draw(&mut surface);

        assert_eq!(surface.calls.len(), 1);
        let Call::Blit { src, dst, .. } = &surface.calls[0] else {
            panic!("expected a body blit");
        };
        // WalkRight strip, frame 1, with the half-pixel inset
        assert_eq!(src.x, 48.0);
        assert_relative_eq!(src.y, 16.0 + 0.5);
        // Destination follows the integrated position
        assert_relative_eq!(dst.x, 10.0 + 150.0 * 0.16);
        assert_relative_eq!(dst.y, 20.0);
        assert_eq!((dst.width, dst.height), (16.0, 16.0));
    }

    #[test]
    fn test_draw_overlays_weapon_while_attacking() {
        let mut player = test_player_with_sheets(100.0, 50.0);
        player.state = PlayerState::Idle {
            facing: Facing::Right,
        };
        player.attack();

        let mut surface = RecordingSurface::default();
        player.draw(&mut surface);

        assert_eq!(surface.calls.len(), 4);
        assert!(matches!(surface.calls[0], Call::Blit { .. }));

        let Call::Push {
            translation,
            rotation,
        } = surface.calls[1]
        else {
            panic!("expected a transform scope");
        };
        assert_eq!(translation, Vec2::new(100.0 + 22.0, 50.0 + 11.0));
        assert_relative_eq!(rotation, 3.0 * std::f32::consts::FRAC_PI_2);

        let Call::BlitFull { dst, .. } = surface.calls[2] else {
            panic!("expected the weapon blit");
        };
        assert_eq!(dst, WEAPON_DST);

        assert_eq!(surface.calls[3], Call::Pop);
    }

    #[test]
    fn test_weapon_vanishes_when_attack_ends() {
        let mut player = test_player_with_sheets(0.0, 0.0);
        player.attack();
        player.update(0.15, &[]);
        player.update(0.15, &[]);
        player.update(0.01, &[]);

        let mut surface = RecordingSurface::default();
        player.draw(&mut surface);
        assert_eq!(surface.calls.len(), 1);
    }
}

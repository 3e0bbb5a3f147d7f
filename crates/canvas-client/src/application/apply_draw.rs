//! Applies inbound draw frames to the rendering surface and clipboard.
//!
//! A frame may carry any number of commands back to back; [`DrawStream`]
//! walks them from a running offset. Unrecognized kinds are skipped (they
//! consume one byte), while a malformed command aborts the frame with a
//! [`DecodeError`] that the lifecycle controller treats like a transport
//! error; the connection closes rather than painting from a corrupt stream.

use canvas_core::{DecodeError, DrawCommand, DrawStream};
use tracing::{debug, trace};

use crate::infrastructure::clipboard::ClipboardSink;
use crate::infrastructure::surface::RenderSurface;

/// Applies every command in `frame`. Returns the number applied.
///
/// # Errors
///
/// Returns the first [`DecodeError`] hit; commands decoded before the error
/// have already been applied.
pub fn apply_draw_frame(
    frame: &[u8],
    surface: &dyn RenderSurface,
    clipboard: &dyn ClipboardSink,
) -> Result<usize, DecodeError> {
    let mut applied = 0;
    for command in DrawStream::new(frame) {
        match command? {
            DrawCommand::Blit(blit) => {
                trace!(
                    "blit {}x{} at ({}, {})",
                    blit.width,
                    blit.height,
                    blit.x,
                    blit.y
                );
                surface.blit(blit.x, blit.y, blit.width, blit.height, &blit.pixels);
            }
            DrawCommand::SetClipboard(text) => {
                clipboard.write_text(&text);
            }
            DrawCommand::Unknown(kind) => {
                debug!("skipping unrecognized draw command kind {kind}");
            }
        }
        applied += 1;
    }
    Ok(applied)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::encode_draw;
    use canvas_core::protocol::messages::BlitCommand;
    use mockall::predicate::eq;

    use crate::infrastructure::clipboard::{MemoryClipboard, MockClipboardSink};
    use crate::infrastructure::surface::FramebufferSurface;

    #[test]
    fn test_blit_frame_paints_the_surface() {
        // Arrange
        let surface = FramebufferSurface::new(4, 4);
        let clipboard = MemoryClipboard::new();
        let frame = encode_draw(&DrawCommand::Blit(BlitCommand {
            x: 1,
            y: 0,
            width: 2,
            height: 1,
            pixels: vec![255, 0, 0, 255, 0, 255, 0, 255],
        }));

        // Act
        let applied =
            apply_draw_frame(&frame, &surface, &clipboard).expect("frame must apply");

        // Assert
        assert_eq!(applied, 1);
        assert_eq!(surface.pixel(1, 0), [255, 0, 0, 255]);
        assert_eq!(surface.pixel(2, 0), [0, 255, 0, 255]);
        assert_eq!(clipboard.write_count(), 0);
    }

    #[test]
    fn test_set_clipboard_frame_writes_the_sink() {
        let surface = FramebufferSurface::new(1, 1);
        let mut clipboard = MockClipboardSink::new();
        clipboard
            .expect_write_text()
            .with(eq("hello"))
            .times(1)
            .return_const(());
        let frame = encode_draw(&DrawCommand::SetClipboard("hello".to_string()));

        let applied =
            apply_draw_frame(&frame, &surface, &clipboard).expect("frame must apply");

        assert_eq!(applied, 1);
    }

    #[test]
    fn test_unknown_command_is_skipped_without_side_effects() {
        let surface = FramebufferSurface::new(1, 1);
        let clipboard = MemoryClipboard::new();

        let applied = apply_draw_frame(&[0x55], &surface, &clipboard).expect("must apply");

        assert_eq!(applied, 1);
        assert_eq!(surface.blit_count(), 0);
        assert_eq!(clipboard.write_count(), 0);
    }

    #[test]
    fn test_batched_frame_applies_every_command() {
        let surface = FramebufferSurface::new(2, 2);
        let clipboard = MemoryClipboard::new();
        let mut frame = encode_draw(&DrawCommand::Blit(BlitCommand {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
            pixels: vec![1, 2, 3, 4],
        }));
        frame.extend_from_slice(&encode_draw(&DrawCommand::SetClipboard("x".to_string())));

        let applied = apply_draw_frame(&frame, &surface, &clipboard).expect("must apply");

        assert_eq!(applied, 2);
        assert_eq!(surface.pixel(0, 0), [1, 2, 3, 4]);
        assert_eq!(clipboard.read_text(), Some("x".to_string()));
    }

    #[test]
    fn test_truncated_frame_propagates_decode_error() {
        let surface = FramebufferSurface::new(1, 1);
        let clipboard = MemoryClipboard::new();
        // Blit header claiming a payload that never arrives.
        let mut frame = vec![1u8];
        frame.extend_from_slice(&0u32.to_be_bytes());
        frame.extend_from_slice(&0u32.to_be_bytes());
        frame.extend_from_slice(&1u32.to_be_bytes());
        frame.extend_from_slice(&1u32.to_be_bytes());

        let result = apply_draw_frame(&frame, &surface, &clipboard);

        assert!(matches!(result, Err(DecodeError::Truncated { .. })));
        assert_eq!(surface.blit_count(), 0, "no partial blit");
    }

    #[test]
    fn test_commands_before_an_error_are_already_applied() {
        let surface = FramebufferSurface::new(1, 1);
        let clipboard = MemoryClipboard::new();
        let mut frame = encode_draw(&DrawCommand::SetClipboard("kept".to_string()));
        frame.extend_from_slice(&[2, 0, 0, 0]); // truncated length prefix

        let result = apply_draw_frame(&frame, &surface, &clipboard);

        assert!(result.is_err());
        assert_eq!(clipboard.read_text(), Some("kept".to_string()));
    }

    #[test]
    fn test_empty_frame_applies_nothing() {
        let surface = FramebufferSurface::new(1, 1);
        let clipboard = MemoryClipboard::new();
        assert_eq!(apply_draw_frame(&[], &surface, &clipboard), Ok(0));
    }
}

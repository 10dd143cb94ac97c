// src/backends/x11.rs

//! X11 `Driver` implementation.
//!
//! Owns the display connection, a single InputOutput window, and the RGBA
//! framebuffer the rasterizer draws into. Presentation converts the
//! framebuffer to the server's ZPixmap layout and pushes it with
//! `XPutImage`; wheel motion arrives as button 4/5 presses and is
//! translated to the scroll variants of `MouseButton`.

use log::{debug, error, info, trace, warn};

use crate::backends::{BackendEvent, Driver, MouseButton};
use crate::keys::{KeySymbol, Modifiers};

use anyhow::{bail, Context, Result};
use std::ffi::CString;
use std::mem;
use std::ptr;

use libc::{c_char, c_int, c_uint};

use x11::keysym;
use x11::xlib;

const KEY_TEXT_BUFFER_SIZE: usize = 32;
const BYTES_PER_PIXEL: usize = 4;

pub struct XDriver {
    display: *mut xlib::Display,
    screen: c_int,
    window: xlib::Window,
    gc: xlib::GC,
    visual: *mut xlib::Visual,
    width_px: u32,
    height_px: u32,
    /// RGBA pixels the rasterizer writes, row-major.
    framebuffer: Vec<u8>,
    /// Staging buffer in the server's BGRX layout, rebuilt each present.
    xbuffer: Vec<u8>,
    wm_delete_window: xlib::Atom,
    cleaned_up: bool,
}

impl XDriver {
    /// Connects to the X server and maps a window of the requested size.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            bail!("XOpenDisplay failed; is DISPLAY set?");
        }

        let screen = unsafe { xlib::XDefaultScreen(display) };
        let visual = unsafe { xlib::XDefaultVisual(display, screen) };

        let window = unsafe {
            let root = xlib::XRootWindow(display, screen);
            let black = xlib::XBlackPixel(display, screen);
            xlib::XCreateSimpleWindow(
                display,
                root,
                0,
                0,
                width as c_uint,
                height as c_uint,
                0,
                black,
                black,
            )
        };
        if window == 0 {
            unsafe { xlib::XCloseDisplay(display) };
            bail!("XCreateSimpleWindow failed");
        }
        debug!("X window created (ID: {window}), initial size: {width}x{height}px");

        unsafe {
            xlib::XSelectInput(
                display,
                window,
                xlib::ExposureMask
                    | xlib::KeyPressMask
                    | xlib::StructureNotifyMask
                    | xlib::ButtonPressMask
                    | xlib::ButtonReleaseMask
                    | xlib::PointerMotionMask,
            );
        }

        let gc = unsafe {
            let values: xlib::XGCValues = mem::zeroed();
            xlib::XCreateGC(display, window, 0, &values as *const _ as *mut _)
        };
        if gc.is_null() {
            unsafe {
                xlib::XDestroyWindow(display, window);
                xlib::XCloseDisplay(display);
            }
            bail!("XCreateGC failed");
        }

        let wm_delete_window = unsafe {
            let atom = xlib::XInternAtom(
                display,
                b"WM_DELETE_WINDOW\0".as_ptr() as *const c_char,
                xlib::False,
            );
            if atom != 0 {
                xlib::XSetWMProtocols(display, window, [atom].as_mut_ptr(), 1);
            } else {
                warn!("WM_DELETE_WINDOW atom unavailable; close button will be ignored");
            }
            atom
        };

        let mut driver = Self {
            display,
            screen,
            window,
            gc,
            visual,
            width_px: width,
            height_px: height,
            framebuffer: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
            xbuffer: Vec::new(),
            wm_delete_window,
            cleaned_up: false,
        };
        driver.set_title(title);

        unsafe {
            xlib::XMapWindow(display, window);
            xlib::XFlush(display);
        }
        info!("X11 driver initialized on screen {}", driver.screen);
        Ok(driver)
    }

    fn x_state_to_modifiers(state: c_uint) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        if (state & xlib::ShiftMask) != 0 {
            modifiers.insert(Modifiers::SHIFT);
        }
        if (state & xlib::ControlMask) != 0 {
            modifiers.insert(Modifiers::CONTROL);
        }
        if (state & xlib::Mod1Mask) != 0 {
            modifiers.insert(Modifiers::ALT);
        }
        if (state & xlib::Mod4Mask) != 0 {
            modifiers.insert(Modifiers::SUPER);
        }
        modifiers
    }

    fn x_button_to_mouse_button(button: c_uint) -> MouseButton {
        match button {
            xlib::Button1 => MouseButton::Left,
            xlib::Button2 => MouseButton::Middle,
            xlib::Button3 => MouseButton::Right,
            xlib::Button4 => MouseButton::ScrollUp,
            xlib::Button5 => MouseButton::ScrollDown,
            other => MouseButton::Other(other as u8),
        }
    }

    fn resize_framebuffer(&mut self, width: u32, height: u32) {
        self.width_px = width;
        self.height_px = height;
        self.framebuffer
            .resize(width as usize * height as usize * BYTES_PER_PIXEL, 0);
    }

    fn translate_event(&mut self, event: &mut xlib::XEvent) -> Option<BackendEvent> {
        match unsafe { event.type_ } {
            xlib::KeyPress => {
                let xkey = unsafe { &mut event.key };
                let mut text_buf = [0u8; KEY_TEXT_BUFFER_SIZE];
                let mut keysym_val: xlib::KeySym = 0;
                let len = unsafe {
                    xlib::XLookupString(
                        xkey,
                        text_buf.as_mut_ptr() as *mut c_char,
                        KEY_TEXT_BUFFER_SIZE as c_int,
                        &mut keysym_val,
                        ptr::null_mut(),
                    )
                };
                let text = String::from_utf8_lossy(&text_buf[..len.max(0) as usize]).into_owned();
                Some(BackendEvent::Key {
                    symbol: xkeysym_to_keysymbol(keysym_val, &text),
                    modifiers: Self::x_state_to_modifiers(xkey.state),
                })
            }
            xlib::ButtonPress => {
                let xbutton = unsafe { &event.button };
                Some(BackendEvent::MouseButtonPress {
                    button: Self::x_button_to_mouse_button(xbutton.button),
                    x: xbutton.x as f32,
                    y: xbutton.y as f32,
                    modifiers: Self::x_state_to_modifiers(xbutton.state),
                })
            }
            xlib::ButtonRelease => {
                let xbutton = unsafe { &event.button };
                Some(BackendEvent::MouseButtonRelease {
                    button: Self::x_button_to_mouse_button(xbutton.button),
                    x: xbutton.x as f32,
                    y: xbutton.y as f32,
                    modifiers: Self::x_state_to_modifiers(xbutton.state),
                })
            }
            xlib::MotionNotify => {
                let xmotion = unsafe { &event.motion };
                Some(BackendEvent::MouseMove {
                    x: xmotion.x as f32,
                    y: xmotion.y as f32,
                    modifiers: Self::x_state_to_modifiers(xmotion.state),
                })
            }
            xlib::ConfigureNotify => {
                let xconfigure = unsafe { &event.configure };
                let (w, h) = (xconfigure.width.max(1) as u32, xconfigure.height.max(1) as u32);
                if (w, h) != (self.width_px, self.height_px) {
                    trace!("window resized to {w}x{h}");
                    self.resize_framebuffer(w, h);
                    Some(BackendEvent::Resize {
                        width_px: w,
                        height_px: h,
                    })
                } else {
                    None
                }
            }
            xlib::Expose => {
                let xexpose = unsafe { &event.expose };
                (xexpose.count == 0).then_some(BackendEvent::Expose)
            }
            xlib::ClientMessage => {
                let xclient = unsafe { &event.client_message };
                if xclient.data.get_long(0) as xlib::Atom == self.wm_delete_window {
                    Some(BackendEvent::CloseRequested)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl Driver for XDriver {
    fn process_events(&mut self) -> Result<Vec<BackendEvent>> {
        let mut events = Vec::new();
        while unsafe { xlib::XPending(self.display) } > 0 {
            let mut event: xlib::XEvent = unsafe { mem::zeroed() };
            unsafe { xlib::XNextEvent(self.display, &mut event) };
            if let Some(translated) = self.translate_event(&mut event) {
                events.push(translated);
            }
        }
        Ok(events)
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    fn framebuffer_mut(&mut self) -> &mut [u8] {
        &mut self.framebuffer
    }

    fn present(&mut self) -> Result<()> {
        trace!("presenting {}x{} frame", self.width_px, self.height_px);

        // ZPixmap at depth 24 wants BGRX in memory on little-endian servers.
        self.xbuffer.clear();
        self.xbuffer.reserve(self.framebuffer.len());
        for px in self.framebuffer.chunks_exact(BYTES_PER_PIXEL) {
            self.xbuffer.extend_from_slice(&[px[2], px[1], px[0], 0]);
        }

        unsafe {
            let image = xlib::XCreateImage(
                self.display,
                self.visual,
                24,
                xlib::ZPixmap,
                0,
                self.xbuffer.as_ptr() as *mut c_char,
                self.width_px,
                self.height_px,
                32,
                0,
            );
            if image.is_null() {
                bail!("XCreateImage failed for {}x{} frame", self.width_px, self.height_px);
            }
            xlib::XPutImage(
                self.display,
                self.window,
                self.gc,
                image,
                0,
                0,
                0,
                0,
                self.width_px,
                self.height_px,
            );
            // The staging buffer stays ours; detach it before destroy.
            (*image).data = ptr::null_mut();
            xlib::XDestroyImage(image);
            xlib::XFlush(self.display);
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        let Ok(title_cstr) = CString::new(title) else {
            warn!("window title contains a NUL byte; not set");
            return;
        };
        unsafe {
            xlib::XStoreName(self.display, self.window, title_cstr.as_ptr() as *mut c_char);
            xlib::XFlush(self.display);
        }
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        self.cleaned_up = true;
        unsafe {
            if !self.gc.is_null() {
                xlib::XFreeGC(self.display, self.gc);
            }
            if self.window != 0 {
                xlib::XDestroyWindow(self.display, self.window);
            }
            if !self.display.is_null() {
                xlib::XCloseDisplay(self.display);
            }
        }
        debug!("X11 driver resources released");
        Ok(())
    }
}

impl Drop for XDriver {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            error!("error during XDriver cleanup in drop: {e}");
        }
    }
}

/// Translates an X11 KeySym (plus any text `XLookupString` produced) into
/// the viewer's key vocabulary.
fn xkeysym_to_keysymbol(keysym_val: xlib::KeySym, text: &str) -> KeySymbol {
    if keysym_val > u64::from(u32::MAX) {
        return first_char_or_unknown(text);
    }
    match keysym_val as u32 {
        keysym::XK_Shift_L | keysym::XK_Shift_R => KeySymbol::Shift,
        keysym::XK_Control_L | keysym::XK_Control_R => KeySymbol::Control,
        keysym::XK_Alt_L | keysym::XK_Alt_R | keysym::XK_Meta_L | keysym::XK_Meta_R => {
            KeySymbol::Alt
        }
        keysym::XK_Super_L | keysym::XK_Super_R => KeySymbol::Super,
        keysym::XK_Return | keysym::XK_KP_Enter => KeySymbol::Enter,
        keysym::XK_Escape => KeySymbol::Escape,
        keysym::XK_Home | keysym::XK_KP_Home => KeySymbol::Home,
        keysym::XK_End | keysym::XK_KP_End => KeySymbol::End,
        keysym::XK_Left => KeySymbol::Left,
        keysym::XK_Up => KeySymbol::Up,
        keysym::XK_Right => KeySymbol::Right,
        keysym::XK_Down => KeySymbol::Down,
        keysym::XK_Page_Up => KeySymbol::PageUp,
        keysym::XK_Page_Down => KeySymbol::PageDown,
        _ => first_char_or_unknown(text),
    }
}

fn first_char_or_unknown(text: &str) -> KeySymbol {
    match text.chars().next() {
        Some(ch) if ch != '\u{FFFD}' => KeySymbol::Char(ch),
        _ => KeySymbol::Unknown,
    }
}

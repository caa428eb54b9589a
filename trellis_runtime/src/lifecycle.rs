// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page lifecycle table and phase state machine.

use core::fmt;

/// Page events known to the runtime.
///
/// Each event has a registry name (what hooks subscribe to) and a default host method name
/// (what the host calls). They only differ for [`Unload`](Self::Unload).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PageEvent {
    /// Page created; payload is the route query.
    Load,
    /// Page became visible.
    Show,
    /// First render finished on the host.
    Ready,
    /// Page hidden.
    Hide,
    /// Page destroyed.
    Unload,
    /// Pull-down refresh gesture.
    PullDownRefresh,
    /// Pull-down intercepted by the host.
    PullIntercept,
    /// Scrolled to the bottom.
    ReachBottom,
    /// Page scrolled.
    PageScroll,
    /// Share action; handlers may return the share content.
    ShareAppMessage,
    /// Navigation bar title clicked.
    TitleClick,
    /// Option menu clicked.
    OptionMenuClick,
    /// Pop menu clicked.
    PopMenuClick,
    /// Window resized.
    Resize,
    /// Tab bar item tapped.
    TabItemTap,
    /// Tab bar item about to navigate.
    BeforeTabItemTap,
    /// Soft keyboard height changed.
    KeyboardHeight,
    /// Back navigation.
    Back,
}

impl PageEvent {
    /// Every known page event, in host declaration order.
    pub const ALL: [Self; 18] = [
        Self::Load,
        Self::Show,
        Self::Ready,
        Self::Hide,
        Self::Unload,
        Self::PullDownRefresh,
        Self::PullIntercept,
        Self::ReachBottom,
        Self::PageScroll,
        Self::ShareAppMessage,
        Self::TitleClick,
        Self::OptionMenuClick,
        Self::PopMenuClick,
        Self::Resize,
        Self::TabItemTap,
        Self::BeforeTabItemTap,
        Self::KeyboardHeight,
        Self::Back,
    ];

    /// Registry name hooks subscribe to.
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Load => "onLoad",
            Self::Show => "onShow",
            Self::Ready => "onReady",
            Self::Hide => "onHide",
            Self::Unload => "unload",
            Self::PullDownRefresh => "onPullDownRefresh",
            Self::PullIntercept => "onPullIntercept",
            Self::ReachBottom => "onReachBottom",
            Self::PageScroll => "onPageScroll",
            Self::ShareAppMessage => "onShareAppMessage",
            Self::TitleClick => "onTitleClick",
            Self::OptionMenuClick => "onOptionMenuClick",
            Self::PopMenuClick => "onPopMenuClick",
            Self::Resize => "onResize",
            Self::TabItemTap => "onTabItemTap",
            Self::BeforeTabItemTap => "beforeTabItemTap",
            Self::KeyboardHeight => "onKeyboardHeight",
            Self::Back => "onBack",
        }
    }

    /// Default host method name.
    pub const fn host_method(self) -> &'static str {
        match self {
            Self::Unload => "onUnload",
            other => other.event_name(),
        }
    }

    /// Look up an event by registry name.
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.event_name() == name)
    }

    /// Look up an event by registry name or default host method name.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.event_name() == name || e.host_method() == name)
    }

    /// Events every page config exposes regardless of declarations.
    pub const fn is_core(self) -> bool {
        matches!(self, Self::Load | Self::Unload)
    }

    /// Phases in which the host may report this event.
    pub const fn allowed(self) -> PhaseSet {
        match self {
            Self::Load => PhaseSet::UNMOUNTED,
            Self::Unload => PhaseSet::UNMOUNTED.union(PhaseSet::LIVE),
            _ => PhaseSet::LIVE,
        }
    }

    /// Phase after handling this event in `from`; `from` for pass-through events.
    pub const fn next_phase(self, from: PagePhase) -> PagePhase {
        match (self, from) {
            (Self::Load, _) => PagePhase::Loaded,
            (Self::Unload, _) => PagePhase::Unloaded,
            (Self::Show, _) => PagePhase::Shown,
            (Self::Hide, _) => PagePhase::Hidden,
            (Self::Ready, PagePhase::Loaded) => PagePhase::Ready,
            (_, phase) => phase,
        }
    }
}

impl fmt::Display for PageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Lifecycle phase of a page.
///
/// `Unmounted → Loaded → Ready → (Shown ⇄ Hidden) → Unloaded`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PagePhase {
    /// Config created, `onLoad` not yet reported.
    #[default]
    Unmounted,
    /// Tree mounted.
    Loaded,
    /// Host finished its first render.
    Ready,
    /// Visible.
    Shown,
    /// Hidden.
    Hidden,
    /// Terminal; nothing may be dispatched any more.
    Unloaded,
}

impl PagePhase {
    /// The flag for this phase.
    pub const fn flag(self) -> PhaseSet {
        match self {
            Self::Unmounted => PhaseSet::UNMOUNTED,
            Self::Loaded => PhaseSet::LOADED,
            Self::Ready => PhaseSet::READY,
            Self::Shown => PhaseSet::SHOWN,
            Self::Hidden => PhaseSet::HIDDEN,
            Self::Unloaded => PhaseSet::UNLOADED,
        }
    }

    /// Returns true between `onLoad` and `onUnload`.
    pub const fn is_live(self) -> bool {
        PhaseSet::LIVE.contains(self.flag())
    }
}

bitflags::bitflags! {
    /// A set of [`PagePhase`]s.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PhaseSet: u8 {
        /// [`PagePhase::Unmounted`].
        const UNMOUNTED = 0b0000_0001;
        /// [`PagePhase::Loaded`].
        const LOADED    = 0b0000_0010;
        /// [`PagePhase::Ready`].
        const READY     = 0b0000_0100;
        /// [`PagePhase::Shown`].
        const SHOWN     = 0b0000_1000;
        /// [`PagePhase::Hidden`].
        const HIDDEN    = 0b0001_0000;
        /// [`PagePhase::Unloaded`].
        const UNLOADED  = 0b0010_0000;
        /// Every phase between load and unload.
        const LIVE = Self::LOADED.bits() | Self::READY.bits() | Self::SHOWN.bits() | Self::HIDDEN.bits();
    }
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive a [`Page`] the way a host does.
//!
//! [`HostPage`] has one method per host gesture, each sending the payload the host would send.
//! It is meant for tests and demos.

use serde_json::{Value, json};

use crate::lifecycle::PageEvent;
use crate::page::{Page, PageError};

/// Result of one host call.
pub type HostResult = Result<Option<Value>, PageError>;

/// A [`Page`] with host gestures.
#[derive(Debug)]
pub struct HostPage {
    page: Page,
}

impl HostPage {
    /// Wrap `page`.
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// The wrapped page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// The wrapped page, mutably.
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// Unwrap the page.
    pub fn into_inner(self) -> Page {
        self.page
    }

    /// Call a page event's default host method.
    pub fn call(&mut self, event: PageEvent, payload: Value) -> HostResult {
        self.page.invoke(event.host_method(), payload)
    }

    /// Open the page with an empty query: `onLoad`, then `onShow`.
    pub fn load(&mut self) -> HostResult {
        self.load_with(json!({}))
    }

    /// Open the page with `query`: `onLoad`, then `onShow`.
    ///
    /// Returns the result of `onShow`.
    pub fn load_with(&mut self, query: Value) -> HostResult {
        self.call(PageEvent::Load, query)?;
        self.show()
    }

    /// `onReady`.
    pub fn ready(&mut self) -> HostResult {
        self.call(PageEvent::Ready, Value::Null)
    }

    /// `onShow`.
    pub fn show(&mut self) -> HostResult {
        self.call(PageEvent::Show, Value::Null)
    }

    /// `onHide`.
    pub fn hide(&mut self) -> HostResult {
        self.call(PageEvent::Hide, Value::Null)
    }

    /// `onUnload`.
    pub fn unload(&mut self) -> HostResult {
        self.call(PageEvent::Unload, Value::Null)
    }

    /// `onPullDownRefresh`.
    pub fn pull_down_refresh(&mut self) -> HostResult {
        self.call(PageEvent::PullDownRefresh, Value::Null)
    }

    /// `onPullIntercept`.
    pub fn pull_intercept(&mut self) -> HostResult {
        self.call(PageEvent::PullIntercept, Value::Null)
    }

    /// `onReachBottom`.
    pub fn reach_bottom(&mut self) -> HostResult {
        self.call(PageEvent::ReachBottom, Value::Null)
    }

    /// `onPageScroll` at the top of the page.
    pub fn page_scroll(&mut self) -> HostResult {
        self.call(PageEvent::PageScroll, json!({ "scrollTop": 0 }))
    }

    /// `onShareAppMessage` from the share menu.
    pub fn share_app_message(&mut self) -> HostResult {
        self.call(PageEvent::ShareAppMessage, json!({ "from": "menu" }))
    }

    /// `onTitleClick`.
    pub fn title_click(&mut self) -> HostResult {
        self.call(PageEvent::TitleClick, Value::Null)
    }

    /// `onOptionMenuClick`.
    pub fn option_menu_click(&mut self) -> HostResult {
        self.call(PageEvent::OptionMenuClick, Value::Null)
    }

    /// `onPopMenuClick`.
    pub fn pop_menu_click(&mut self) -> HostResult {
        self.call(PageEvent::PopMenuClick, Value::Null)
    }

    /// `onBack`.
    pub fn back(&mut self) -> HostResult {
        self.call(PageEvent::Back, Value::Null)
    }

    /// `onKeyboardHeight` with a closed keyboard.
    pub fn keyboard_height(&mut self) -> HostResult {
        self.call(PageEvent::KeyboardHeight, json!({ "height": 0 }))
    }

    /// `onTabItemTap` on the first tab.
    pub fn tab_item_tap(&mut self) -> HostResult {
        self.call(PageEvent::TabItemTap, json!({ "index": 0 }))
    }

    /// `beforeTabItemTap`.
    pub fn before_tab_item_tap(&mut self) -> HostResult {
        self.call(PageEvent::BeforeTabItemTap, Value::Null)
    }

    /// `onResize`.
    pub fn resize(&mut self) -> HostResult {
        self.call(PageEvent::Resize, json!({ "size": { "windowWidth": 375 } }))
    }
}

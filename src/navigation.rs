//! This file defines the tabs for switching between the dashboard views.

use maud::{Markup, html};

use crate::{
    dashboard::DashboardQuery,
    endpoints::{self, format_endpoint},
};

/// A tab in the dashboard navigation.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one tab should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self, query: &DashboardQuery) -> Markup {
        let style = if self.is_current {
            "inline-block p-4 text-blue-600 border-b-2 border-blue-600
            rounded-t-lg dark:text-blue-500 dark:border-blue-500"
        } else {
            "inline-block p-4 border-b-2 border-transparent rounded-t-lg
            hover:text-gray-600 hover:border-gray-300 dark:hover:text-gray-300"
        };
        let href = format_endpoint(self.url, query);

        html!(
            a
                href=(href)
                hx-get=(href)
                hx-target="#dashboard-content"
                hx-target-error="#alert-container"
                hx-push-url="true"
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the dashboard tabs.
    ///
    /// If a tab matches `active_endpoint`, then that tab will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: "Overview",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::TRANSACTIONS_VIEW,
                title: "Transactions",
                is_current: active_endpoint == endpoints::TRANSACTIONS_VIEW,
            },
        ];

        NavBar { links }
    }

    /// Render the tabs, keeping the current dashboard options in the links.
    pub fn into_html(self, query: &DashboardQuery) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/tabs/#tabs-with-underline
        html!(
            nav
                class="w-full text-sm font-medium text-center text-gray-500
                border-b border-gray-200 dark:text-gray-400 dark:border-gray-700"
            {
                ul class="flex flex-wrap -mb-px"
                {
                    @for link in self.links {
                        li class="me-2" { (link.into_html(query)) }
                    }
                }
            }
        )
    }
}
